//! The request lifecycle controller.

use crate::environment::ControllerEnvironment;
use crate::ready::{Ready, ReadySlot};
use crate::timers::Timers;
use netrequest_core::{
    AbortController, AfterHook, BeforeHook, ControllerError, ControllerId, EventKind, FailedEvent,
    HookOutcome, LifecycleState, ListenerId, ListenerOptions, OptionKey, RequestConfig,
    RequestDescriptor, RequestEvent, RequestOption, RequestResult, Response, SuccessEvent,
    TransportError,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;

/// Drives a single logical request through `init → pending → fulfilled | rejected`.
///
/// The controller owns one request configuration at a time. [`send`](Self::send)
/// runs the before-hooks, hands the resulting descriptor to the transport and
/// returns immediately; the settlement runs the after-hooks, updates
/// [`state`](Self::state), publishes a `success` or `failed` event and resolves
/// the current [`Ready`] handle.
///
/// Cloning is cheap and every clone drives the same request. Dropping the last
/// clone cancels any retry or timeout timer; an attempt already in flight still
/// settles.
///
/// # Example
///
/// ```ignore
/// let controller = RequestController::new(
///     RequestConfig::builder("https://example.com/orders")
///         .time_out(Duration::from_secs(5))
///         .build(),
///     ControllerEnvironment::new(Arc::new(ReqwestTransport::new())),
/// )?;
///
/// let ready = controller.ready();
/// controller.send();
/// let result = ready.wait().await?;
///
/// if controller.state() == LifecycleState::Rejected {
///     controller.retry(Some(Duration::from_secs(1)))?;
/// }
/// ```
#[derive(Clone)]
pub struct RequestController {
    inner: Arc<Inner>,
}

struct Inner {
    id: ControllerId,
    env: ControllerEnvironment,
    runtime: Handle,
    shared: Mutex<Shared>,
}

struct Shared {
    config: RequestConfig,
    abort: AbortController,
    descriptor: RequestDescriptor,
    ready: ReadySlot,
    state: LifecycleState,
    result: Option<RequestResult>,
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
    timers: Timers,
}

impl Shared {
    fn new(config: RequestConfig) -> Self {
        let abort = AbortController::new();
        let descriptor = RequestDescriptor::from_config(&config, abort.signal());
        Self {
            config,
            abort,
            descriptor,
            ready: ReadySlot::new(),
            state: LifecycleState::Init,
            result: None,
            before: Vec::new(),
            after: Vec::new(),
            timers: Timers::default(),
        }
    }

    /// Fresh abort handle, descriptor and ready slot for `config`.
    fn rearm(&mut self, config: RequestConfig) {
        self.abort = AbortController::new();
        self.descriptor = RequestDescriptor::from_config(&config, self.abort.signal());
        self.config = config;
        self.ready = ReadySlot::new();
    }
}

impl RequestController {
    /// Create a controller in the `init` state.
    ///
    /// Nothing is sent until [`send`](Self::send) is called.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::NoRuntime`] when called outside a Tokio
    /// runtime; timers and transport calls are spawned on the runtime that
    /// created the controller.
    pub fn new(config: RequestConfig, env: ControllerEnvironment) -> Result<Self, ControllerError> {
        let runtime = Handle::try_current().map_err(|e| ControllerError::NoRuntime(e.to_string()))?;
        let id = ControllerId::next();

        tracing::debug!(
            controller = %id,
            method = %config.method,
            url = %config.url,
            cacheable = config.cacheable,
            time_out = ?config.time_out,
            "Request controller created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                id,
                env,
                runtime,
                shared: Mutex::new(Shared::new(config)),
            }),
        })
    }

    /// Identity carried as the `sender` of published events.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.inner.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    /// Result of the most recent successful settlement.
    #[must_use]
    pub fn result(&self) -> Option<RequestResult> {
        self.lock().result.clone()
    }

    /// Handle on the current attempt cycle's eventual result.
    ///
    /// Take it before calling [`send`](Self::send). A handle is tied to the
    /// cycle it was taken from: after [`update`](Self::update),
    /// [`set_option`](Self::set_option) or [`abort`](Self::abort) a fresh
    /// handle is needed to observe later settlements.
    #[must_use]
    pub fn ready(&self) -> Ready {
        self.lock().ready.handle()
    }

    /// Descriptor the next [`send`](Self::send) starts from, before hooks.
    #[must_use]
    pub fn descriptor(&self) -> RequestDescriptor {
        self.lock().descriptor.clone()
    }

    /// Snapshot of the whole configuration.
    #[must_use]
    pub fn config(&self) -> RequestConfig {
        self.lock().config.clone()
    }

    /// Read a single configuration field.
    #[must_use]
    pub fn option(&self, key: OptionKey) -> RequestOption {
        self.lock().config.get(key)
    }

    /// Change a single configuration field and re-arm.
    #[tracing::instrument(skip(self, option), fields(controller = %self.inner.id, option = ?option.key()))]
    pub fn set_option(&self, option: RequestOption) {
        let mut shared = self.lock();
        let mut config = shared.config.clone();
        config.apply(option);
        shared.rearm(config);
        tracing::trace!("Option set, descriptor rebuilt");
    }

    /// Replace the configuration and re-arm.
    ///
    /// Builds a new descriptor with a fresh abort handle and replaces the
    /// ready slot. Neither sends nor changes the lifecycle state.
    #[tracing::instrument(skip(self, config), fields(controller = %self.inner.id))]
    pub fn update(&self, config: RequestConfig) {
        self.lock().rearm(config);
        tracing::trace!("Descriptor rebuilt");
    }

    /// Register a hook that may replace the outgoing descriptor.
    ///
    /// Hooks run in registration order on every send; each sees the
    /// descriptor produced by the one before it.
    #[tracing::instrument(skip(self, hook), fields(controller = %self.inner.id))]
    pub fn before<F>(&self, hook: F)
    where
        F: Fn(&RequestDescriptor) -> HookOutcome<RequestDescriptor> + Send + Sync + 'static,
    {
        self.lock().before.push(Arc::new(hook));
    }

    /// Register a hook that may replace the result of a successful settlement.
    ///
    /// Hooks run in registration order, each on its own clone of the
    /// response. The last [`HookOutcome::Replace`] wins; if every hook keeps,
    /// the result is the response itself.
    #[tracing::instrument(skip(self, hook), fields(controller = %self.inner.id))]
    pub fn after<F>(&self, hook: F)
    where
        F: Fn(Response) -> HookOutcome<RequestResult> + Send + Sync + 'static,
    {
        self.lock().after.push(Arc::new(hook));
    }

    /// Listen for this controller's events.
    #[tracing::instrument(skip(self, handler), fields(controller = %self.inner.id))]
    pub fn on<F>(&self, kind: EventKind, handler: F, options: ListenerOptions) -> ListenerId
    where
        F: Fn(&RequestEvent) + Send + Sync + 'static,
    {
        self.inner.env.events.subscribe(kind, Arc::new(handler), options)
    }

    /// Remove a listener registered with [`on`](Self::on).
    #[tracing::instrument(skip(self), fields(controller = %self.inner.id))]
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.env.events.unsubscribe(id)
    }

    /// Send the request.
    ///
    /// Moves to `pending` before returning. The transport call runs on the
    /// runtime; its settlement is reported through state, events and the
    /// ready handle. With a non-zero `time_out` a one-shot timer aborts the
    /// attempt if it is still pending when the timer fires.
    ///
    /// Calling `send` while already pending starts a second transport call;
    /// whichever settles last determines the final state.
    #[tracing::instrument(skip(self), fields(controller = %self.inner.id))]
    pub fn send(&self) {
        let (base, signal, hooks) = {
            let shared = self.lock();
            (shared.descriptor.clone(), shared.abort.signal(), shared.before.clone())
        };

        // Hook output is per attempt and never stored back; every send starts
        // from the configured descriptor (DESIGN.md, decision 6).
        let descriptor = hooks
            .iter()
            .fold(base, |descriptor, hook| hook(&descriptor).apply(descriptor));

        {
            let mut shared = self.lock();
            shared.state = LifecycleState::Pending;
            if shared.config.has_time_out() {
                let handle = self.spawn_timeout(shared.config.time_out);
                shared.timers.arm_timeout(handle);
            }
        }

        tracing::debug!(
            method = %descriptor.method(),
            url = %descriptor.url(),
            hooks = hooks.len(),
            "Request pending"
        );

        let controller = self.clone();
        let transport = Arc::clone(&self.inner.env.transport);
        self.inner.runtime.spawn(async move {
            let outcome = transport.execute(descriptor.clone(), signal).await;
            controller.settle(descriptor, outcome);
        });
    }

    /// Re-send a rejected request.
    ///
    /// With `None` (or a zero interval) the request is sent once right away.
    /// With `Some(interval)` it is re-sent every `interval` until a successful
    /// settlement, [`abort`](Self::abort) or drop clears the timer.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidState`] without side effects unless
    /// the state is `rejected`.
    #[tracing::instrument(skip(self), fields(controller = %self.inner.id))]
    pub fn retry(&self, interval: Option<Duration>) -> Result<(), ControllerError> {
        let interval = interval.filter(|interval| !interval.is_zero());
        {
            let mut shared = self.lock();
            if shared.state != LifecycleState::Rejected {
                tracing::warn!(state = %shared.state, "Cannot retry a request that is not rejected");
                return Err(ControllerError::InvalidState {
                    operation: "retry",
                    state: shared.state,
                });
            }

            if let Some(interval) = interval {
                tracing::debug!(?interval, "Arming retry timer");
                let handle = self.spawn_retry(interval);
                shared.timers.arm_retry(handle);
                return Ok(());
            }
        }

        self.send();
        Ok(())
    }

    /// Cancel the pending attempt.
    ///
    /// Fires the abort signal, clears the retry and timeout timers and
    /// re-arms with the current configuration. The move to `rejected` happens
    /// once the transport reports the abort.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidState`] without side effects unless
    /// the state is `pending`.
    #[tracing::instrument(skip(self), fields(controller = %self.inner.id))]
    pub fn abort(&self) -> Result<(), ControllerError> {
        let mut shared = self.lock();
        if shared.state != LifecycleState::Pending {
            tracing::warn!(state = %shared.state, "Cannot abort a request that is not pending");
            return Err(ControllerError::InvalidState {
                operation: "abort",
                state: shared.state,
            });
        }

        shared.abort.abort();
        shared.timers.clear_retry();
        shared.timers.clear_timeout();
        let config = shared.config.clone();
        shared.rearm(config);

        tracing::debug!("Request aborted");
        Ok(())
    }

    /// Whether a retry timer is armed.
    #[must_use]
    pub fn has_retry_timer(&self) -> bool {
        self.lock().timers.has_retry()
    }

    /// Whether a timeout timer is armed.
    #[must_use]
    pub fn has_timeout_timer(&self) -> bool {
        self.lock().timers.has_timeout()
    }

    fn settle(&self, descriptor: RequestDescriptor, outcome: Result<Response, TransportError>) {
        match outcome {
            Ok(response) => self.fulfil(descriptor, response),
            Err(error) => self.reject(descriptor, error),
        }

        let shared = self.lock();
        shared.ready.resolve(shared.result.clone());
    }

    fn fulfil(&self, descriptor: RequestDescriptor, response: Response) {
        let (hooks, cacheable) = {
            let mut shared = self.lock();
            shared.timers.clear_timeout();
            shared.timers.clear_retry();
            (shared.after.clone(), shared.config.cacheable)
        };

        if cacheable {
            self.store_in_cache(descriptor, response.clone());
        }

        let result = hooks
            .iter()
            .fold(RequestResult::Response(response.clone()), |result, hook| {
                hook(response.clone()).apply(result)
            });

        {
            let mut shared = self.lock();
            shared.result = Some(result.clone());
            shared.state = LifecycleState::Fulfilled;
        }

        tracing::debug!(controller = %self.inner.id, status = response.status(), "Request fulfilled");
        self.inner.env.events.publish(RequestEvent::Success(SuccessEvent {
            result,
            sender: self.inner.id,
        }));
    }

    fn reject(&self, descriptor: RequestDescriptor, error: TransportError) {
        {
            let mut shared = self.lock();
            shared.state = LifecycleState::Rejected;
            shared.timers.clear_timeout();
        }

        tracing::debug!(controller = %self.inner.id, error = %error, "Request rejected");
        self.inner.env.events.publish(RequestEvent::Failed(FailedEvent {
            error,
            descriptor,
            sender: self.inner.id,
        }));
    }

    fn store_in_cache(&self, descriptor: RequestDescriptor, response: Response) {
        let cache = Arc::clone(&self.inner.env.cache);
        let id = self.inner.id;
        self.inner.runtime.spawn(async move {
            let key = descriptor.cache_key();
            if let Err(error) = cache.put(descriptor, response).await {
                tracing::debug!(controller = %id, %key, %error, "Cache write failed, ignoring");
            }
        });
    }

    fn spawn_timeout(&self, after: Duration) -> tokio::task::JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        self.inner.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(controller) = Self::upgrade(&weak) {
                tracing::debug!(controller = %controller.inner.id, time_out = ?after, "Request timed out");
                let _ = controller.abort();
            }
        })
    }

    fn spawn_retry(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        self.inner.runtime.spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let Some(controller) = Self::upgrade(&weak) else {
                    break;
                };
                tracing::trace!(controller = %controller.inner.id, "Retry timer fired");
                controller.send();
            }
        })
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RequestController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.lock();
        f.debug_struct("RequestController")
            .field("id", &self.inner.id)
            .field("state", &shared.state)
            .field("method", &shared.config.method)
            .field("url", &shared.config.url)
            .finish_non_exhaustive()
    }
}
