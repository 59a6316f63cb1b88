use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    LedgerInconsistencyEvent,
    PointsAwardedEvent,
    PointsRevertedEvent,
};

type BoxedHook<E> = dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static;

/// The sending side of every configured hook. Cheap to clone; each API instance holds one.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub points_awarded_producer: Vec<EventProducer<PointsAwardedEvent>>,
    pub points_reverted_producer: Vec<EventProducer<PointsRevertedEvent>>,
    pub inconsistency_producer: Vec<EventProducer<LedgerInconsistencyEvent>>,
}

impl EventProducers {
    pub async fn publish_points_awarded(&self, event: PointsAwardedEvent) {
        for producer in &self.points_awarded_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_points_reverted(&self, event: PointsRevertedEvent) {
        for producer in &self.points_reverted_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_inconsistency(&self, event: LedgerInconsistencyEvent) {
        for producer in &self.inconsistency_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_points_awarded: Option<EventHandler<PointsAwardedEvent>>,
    pub on_points_reverted: Option<EventHandler<PointsRevertedEvent>>,
    pub on_inconsistency: Option<EventHandler<LedgerInconsistencyEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_points_awarded = hooks.on_points_awarded.map(|f| EventHandler::new(buffer_size, f));
        let on_points_reverted = hooks.on_points_reverted.map(|f| EventHandler::new(buffer_size, f));
        let on_inconsistency = hooks.on_inconsistency.map(|f| EventHandler::new(buffer_size, f));
        Self { on_points_awarded, on_points_reverted, on_inconsistency }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_points_awarded {
            result.points_awarded_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_points_reverted {
            result.points_reverted_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_inconsistency {
            result.inconsistency_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_points_awarded {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_points_reverted {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_inconsistency {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_points_awarded: Option<Handler<PointsAwardedEvent>>,
    pub on_points_reverted: Option<Handler<PointsRevertedEvent>>,
    pub on_inconsistency: Option<Handler<LedgerInconsistencyEvent>>,
}

impl EventHooks {
    pub fn on_points_awarded<F>(&mut self, f: F) -> &mut Self
    where F: Fn(PointsAwardedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        let hook: Arc<BoxedHook<PointsAwardedEvent>> = Arc::new(f);
        self.on_points_awarded = Some(hook);
        self
    }

    pub fn on_points_reverted<F>(&mut self, f: F) -> &mut Self
    where F: Fn(PointsRevertedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        let hook: Arc<BoxedHook<PointsRevertedEvent>> = Arc::new(f);
        self.on_points_reverted = Some(hook);
        self
    }

    pub fn on_inconsistency<F>(&mut self, f: F) -> &mut Self
    where F: Fn(LedgerInconsistencyEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        let hook: Arc<BoxedHook<LedgerInconsistencyEvent>> = Arc::new(f);
        self.on_inconsistency = Some(hook);
        self
    }
}
