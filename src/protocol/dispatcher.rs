use crate::core::packet::{Packet, PacketType};
use crate::error::{constants, CodecError, ProtocolError, Result};
use crate::utils::metrics::{global_metrics, Timer};
use crate::utils::scheduler::{ScheduledTask, Scheduler};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::warn;

type HandlerFn = dyn Fn(&dyn Packet) -> Result<()> + Send + Sync + 'static;

/// Routes decoded packets to handlers by concrete packet type.
/// Clones share the same handler table.
#[derive(Clone)]
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<TypeId, Arc<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Install the handler for `T`, replacing any previous one.
    pub fn register<T, F>(&self, handler: F) -> Result<()>
    where
        T: Packet,
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| ProtocolError::LockPoisoned(constants::ERR_DISPATCHER_WRITE_LOCK))?;

        let erased = move |packet: &dyn Packet| match packet.downcast_ref::<T>() {
            Some(packet) => handler(packet),
            None => Err(CodecError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: packet.packet_type().name(),
            }
            .into()),
        };

        let packet_type = PacketType::of::<T>();
        if handlers
            .insert(packet_type.type_id(), Arc::new(erased))
            .is_some()
        {
            warn!(packet = packet_type.name(), "Replaced existing packet handler");
        }
        Ok(())
    }

    pub fn is_handled(&self, packet_type: &PacketType) -> Result<bool> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| ProtocolError::LockPoisoned(constants::ERR_DISPATCHER_READ_LOCK))?;
        Ok(handlers.contains_key(&packet_type.type_id()))
    }

    pub fn dispatch(&self, packet: &dyn Packet) -> Result<()> {
        let packet_type = packet.packet_type();
        let _timer = Timer::start("dispatch");

        // handlers may register further handlers, so the lock is released before calling
        let handler = self
            .handlers
            .read()
            .map_err(|_| ProtocolError::LockPoisoned(constants::ERR_DISPATCHER_READ_LOCK))?
            .get(&packet_type.type_id())
            .cloned();

        let result = handler
            .ok_or(ProtocolError::UnhandledPacket(packet_type.name()))
            .and_then(|handler| handler(packet));

        match &result {
            Ok(()) => global_metrics().packet_dispatched(),
            Err(_) => global_metrics().dispatch_error(),
        }
        result
    }

    /// Dispatch `packet` on `scheduler` after an optional delay. Handler
    /// errors are logged, since there is no caller left to return them to.
    pub fn dispatch_deferred(
        &self,
        packet: Box<dyn Packet>,
        scheduler: &dyn Scheduler,
        delay: Option<Duration>,
    ) -> ScheduledTask {
        let dispatcher = self.clone();
        let mut packet = Some(packet);
        scheduler.schedule(
            delay,
            None,
            Box::new(move || {
                if let Some(packet) = packet.take() {
                    if let Err(e) = dispatcher.dispatch(packet.as_ref()) {
                        warn!(
                            packet = packet.packet_type().name(),
                            error = %e,
                            "Deferred dispatch failed"
                        );
                    }
                }
            }),
        )
    }
}
