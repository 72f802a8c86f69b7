//! Synchronous, in-process event bus driving the builder pipeline.
//!
//! Listeners subscribe to one concrete event type under an owner tag.
//! Dispatch order is registration order, adjusted by explicit "run before
//! owner X" constraints that are resolved by a topological sort whenever a
//! listener is added.

mod lifecycle;


pub use lifecycle::{
    BuildEntity, BuildOperation, BuildProperty, EntityTypeUpdated, PreBuildEntity,
    UpdatedOperationReference, UpdatedPropertyType, UpdatedPropertyValueReference,
};

use crate::{ThisError, builder::BuildError};
use derive_more::Display;
use std::{
    any::{Any, TypeId},
    collections::{BTreeSet, HashMap},
    fmt,
};

///
/// ListenerOwner
///
/// Tag identifying who registered a listener; ordering constraints refer
/// to owners, not to individual listeners.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ListenerOwner(&'static str);

impl ListenerOwner {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

///
/// ListenerError
///

#[derive(Debug, ThisError)]
pub enum ListenerError {
    /// Logged and skipped; dispatch continues.
    #[error("{0}")]
    Recoverable(String),

    /// Aborts dispatch and the build that triggered it.
    #[error(transparent)]
    Fatal(#[from] BuildError),
}

impl ListenerError {
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self::Recoverable(message.into())
    }
}

///
/// EventError
///

#[derive(Debug, ThisError)]
pub enum EventError {
    #[error("ordering '{owner}' before '{before}' for {event} creates a cycle")]
    OrderingCycle {
        event: &'static str,
        owner: ListenerOwner,
        before: ListenerOwner,
    },
}

///
/// Listener
///

pub trait Listener<E, C> {
    fn on_event(&self, event: &E, context: &mut C) -> Result<(), ListenerError>;
}

impl<E, C, F> Listener<E, C> for F
where
    F: Fn(&E, &mut C) -> Result<(), ListenerError>,
{
    fn on_event(&self, event: &E, context: &mut C) -> Result<(), ListenerError> {
        self(event, context)
    }
}

///
/// DispatchReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failures: Vec<ListenerFailure>,
}

impl DispatchReport {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

///
/// ListenerFailure
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListenerFailure {
    pub owner: ListenerOwner,
    pub message: String,
}

type Handler<C> = Box<dyn Fn(&dyn Any, &mut C) -> Result<(), ListenerError>>;

struct Registration<C> {
    owner: ListenerOwner,
    before: BTreeSet<ListenerOwner>,
    seq: usize,
    handler: Handler<C>,
}

struct Route<C> {
    event: &'static str,
    registrations: Vec<Registration<C>>,
    order: Vec<usize>,
}

impl<C> Route<C> {
    const fn new(event: &'static str) -> Self {
        Self {
            event,
            registrations: Vec::new(),
            order: Vec::new(),
        }
    }

    // Kahn's algorithm; ties go to the earliest registration.
    fn resolve_order(&self) -> Result<Vec<usize>, (ListenerOwner, ListenerOwner)> {
        let regs = &self.registrations;
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); regs.len()];
        let mut indegree = vec![0_usize; regs.len()];

        for (from, reg) in regs.iter().enumerate() {
            for (to, other) in regs.iter().enumerate() {
                if from != to && reg.before.contains(&other.owner) {
                    successors[from].push(to);
                    indegree[to] += 1;
                }
            }
        }

        let mut ready: BTreeSet<(usize, usize)> = regs
            .iter()
            .enumerate()
            .filter(|(index, _)| indegree[*index] == 0)
            .map(|(index, reg)| (reg.seq, index))
            .collect();
        let mut order = Vec::with_capacity(regs.len());

        while let Some((_, index)) = ready.pop_first() {
            order.push(index);

            for &next in &successors[index] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.insert((regs[next].seq, next));
                }
            }
        }

        if order.len() == regs.len() {
            return Ok(order);
        }

        let stuck = regs
            .iter()
            .enumerate()
            .find(|(index, reg)| indegree[*index] > 0 && !reg.before.is_empty())
            .or_else(|| regs.iter().enumerate().find(|(index, _)| indegree[*index] > 0));

        Err(stuck.map_or_else(
            || (regs[0].owner, regs[0].owner),
            |(_, reg)| {
                let before = reg.before.iter().next().copied().unwrap_or(reg.owner);
                (reg.owner, before)
            },
        ))
    }
}

///
/// EventBus
///
/// `C` is the state listeners mutate; it is passed to `handle_event`
/// rather than captured, so the bus and the state can live side by side
/// in the same builder.
///

pub struct EventBus<C> {
    routes: HashMap<TypeId, Route<C>>,
    seq: usize,
}

impl<C: 'static> EventBus<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            seq: 0,
        }
    }

    pub fn add_listener<E, L>(&mut self, owner: ListenerOwner, listener: L)
    where
        E: Any,
        L: Listener<E, C> + 'static,
    {
        let route = self.register(owner, BTreeSet::new(), listener);

        // an unconstrained listener never closes a cycle
        if let Ok(order) = route.resolve_order() {
            route.order = order;
        } else {
            route.order.push(route.registrations.len() - 1);
        }
    }

    /// Register a listener that must run before every listener owned by
    /// `before` for the same event type.
    pub fn add_listener_before<E, L>(
        &mut self,
        owner: ListenerOwner,
        before: ListenerOwner,
        listener: L,
    ) -> Result<(), EventError>
    where
        E: Any,
        L: Listener<E, C> + 'static,
    {
        let route = self.register(owner, BTreeSet::from([before]), listener);

        match route.resolve_order() {
            Ok(order) => {
                route.order = order;
                Ok(())
            }
            Err((owner, before)) => {
                route.registrations.pop();

                Err(EventError::OrderingCycle {
                    event: route.event,
                    owner,
                    before,
                })
            }
        }
    }

    /// Owners subscribed to `E`, in dispatch order.
    #[must_use]
    pub fn listeners<E: Any>(&self) -> Vec<ListenerOwner> {
        self.routes
            .get(&TypeId::of::<E>())
            .map(|route| {
                route
                    .order
                    .iter()
                    .map(|&index| route.registrations[index].owner)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dispatch `event` to every listener of its exact type. Recoverable
    /// listener failures are logged and collected; a fatal one aborts.
    pub fn handle_event<E>(&self, event: &E, context: &mut C) -> Result<DispatchReport, BuildError>
    where
        E: Any + fmt::Debug,
    {
        let mut report = DispatchReport::default();
        let Some(route) = self.routes.get(&TypeId::of::<E>()) else {
            return Ok(report);
        };

        for &index in &route.order {
            let registration = &route.registrations[index];

            match (registration.handler)(event, context) {
                Ok(()) => report.delivered += 1,
                Err(ListenerError::Recoverable(message)) => {
                    tracing::warn!(
                        event = route.event,
                        owner = %registration.owner,
                        %message,
                        "listener failed, continuing dispatch"
                    );
                    report.failures.push(ListenerFailure {
                        owner: registration.owner,
                        message,
                    });
                }
                Err(ListenerError::Fatal(err)) => {
                    tracing::debug!(
                        event = route.event,
                        owner = %registration.owner,
                        error = %err,
                        "listener aborted dispatch"
                    );
                    return Err(err);
                }
            }
        }

        Ok(report)
    }

    fn register<E, L>(
        &mut self,
        owner: ListenerOwner,
        before: BTreeSet<ListenerOwner>,
        listener: L,
    ) -> &mut Route<C>
    where
        E: Any,
        L: Listener<E, C> + 'static,
    {
        let handler: Handler<C> = Box::new(move |event: &dyn Any, context: &mut C| {
            event
                .downcast_ref::<E>()
                .map_or(Ok(()), |event| listener.on_event(event, context))
        });
        let seq = self.seq;
        self.seq += 1;

        let route = self
            .routes
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Route::new(std::any::type_name::<E>()));
        route.registrations.push(Registration {
            owner,
            before,
            seq,
            handler,
        });

        route
    }
}

impl<C: 'static> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self
            .routes
            .values()
            .map(|route| (route.event, route.registrations.len()))
            .collect();
        routes.sort_unstable();

        f.debug_struct("EventBus").field("routes", &routes).finish()
    }
}
