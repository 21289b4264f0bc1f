//! Mount/unmount lifecycle, viewport resize dispatch, animation frames and
//! the one-shot geometry fetch.
//!
//! `Host` stands in for the single-threaded UI event loop. Everything runs on
//! the caller's thread except geometry fetches, which load on a background
//! thread and come back through an `mpsc` channel that [`Host::pump`] polls.
//! Unmounting drops the receiving end, so a fetch that finishes afterwards
//! has nowhere to deliver its result, and sets the fetch's cancel flag so
//! sources stop retrying.
//!
//! ```
//! use gapviz::charts::{ChartData, ChartKind, GrowthData, Surface};
//! use gapviz::models::{Series, Size};
//! use gapviz::{Host, Options};
//!
//! let mut host = Host::new(Size::new(600.0, 800.0));
//! let data = GrowthData::single(Series::from_xy("v", &[(2020.0, 1.0), (2021.0, 2.0)]));
//! let handle = host.mount(
//!     Surface::for_chart(ChartKind::Growth, 600.0),
//!     ChartData::Growth(data),
//!     &Options::default(),
//! );
//! host.resize(Size::new(400.0, 800.0));
//! assert!(host.unmount(handle));
//! assert_eq!(host.listener_count(), 0);
//! ```

use crate::charts::{self, ChartData, Surface, Visualization};
use crate::config::Options;
use crate::error::{Result, VizError};
use crate::geo::Region;
use crate::models::Size;
use crate::viz::scene::Scene;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

pub use crate::charts::PointerEvent;

/// Opaque id of one mounted chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MountHandle(u64);

impl fmt::Display for MountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Viewport-resize listeners, one per mounted instance, in subscription order.
#[derive(Debug, Default)]
pub struct ResizeCoordinator {
    listeners: Vec<MountHandle>,
}

impl ResizeCoordinator {
    /// Returns false if `handle` was already subscribed.
    pub fn subscribe(&mut self, handle: MountHandle) -> bool {
        if self.is_subscribed(handle) {
            return false;
        }
        self.listeners.push(handle);
        true
    }

    pub fn unsubscribe(&mut self, handle: MountHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|h| *h != handle);
        self.listeners.len() != before
    }

    pub fn is_subscribed(&self, handle: MountHandle) -> bool {
        self.listeners.contains(&handle)
    }

    pub fn listeners(&self) -> &[MountHandle] {
        &self.listeners
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Pending animation-frame requests. A handle is queued at most once.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Vec<MountHandle>,
}

impl FrameScheduler {
    pub fn request(&mut self, handle: MountHandle) {
        if !self.pending.contains(&handle) {
            self.pending.push(handle);
        }
    }

    pub fn cancel(&mut self, handle: MountHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.pending.len() != before
    }

    /// Drain the requests for this frame.
    pub fn take(&mut self) -> Vec<MountHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// One in-flight geometry fetch.
struct Fetch {
    receiver: Receiver<Result<Vec<Region>>>,
    cancelled: Arc<AtomicBool>,
}

pub struct Host {
    viewport: Size,
    next_id: u64,
    instances: BTreeMap<MountHandle, Box<dyn Visualization>>,
    coordinator: ResizeCoordinator,
    frames: FrameScheduler,
    fetches: BTreeMap<MountHandle, Fetch>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("viewport", &self.viewport)
            .field("mounted", &self.instances.keys().collect::<Vec<_>>())
            .field("coordinator", &self.coordinator)
            .field("frames", &self.frames)
            .field("fetches", &self.fetches.len())
            .finish()
    }
}

impl Host {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: viewport.sanitized(),
            next_id: 1,
            instances: BTreeMap::new(),
            coordinator: ResizeCoordinator::default(),
            frames: FrameScheduler::default(),
            fetches: BTreeMap::new(),
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Draw `data` on `surface` and start its lifecycle: resize listener,
    /// first frame request and, for maps, the geometry fetch.
    pub fn mount(&mut self, surface: Surface, data: ChartData, options: &Options) -> MountHandle {
        let handle = MountHandle(self.next_id);
        self.next_id += 1;
        let options = options.clone().sanitized();
        let mut instance = charts::build(surface, data, &options);

        if let Some(source) = instance.geometry_source() {
            let (sender, receiver) = mpsc::channel();
            let cancelled = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&cancelled);
            let spawned = thread::Builder::new()
                .name(format!("gapviz-fetch-{}", handle.0))
                .spawn(move || {
                    // The receiver is gone if the chart was unmounted meanwhile.
                    let _ = sender.send(source.load_until(&flag));
                });
            match spawned {
                Ok(_) => {
                    self.fetches.insert(
                        handle,
                        Fetch {
                            receiver,
                            cancelled,
                        },
                    );
                }
                Err(e) => instance.on_geometry(Err(VizError::Io(e))),
            }
        }

        self.coordinator.subscribe(handle);
        if instance.wants_frame() {
            self.frames.request(handle);
        }
        log::info!("mounted {} chart {handle}", instance.kind().name());
        self.instances.insert(handle, instance);
        handle
    }

    /// Tear down `handle`: listener, frames, pending fetch and the chart itself.
    /// Returns false if it was not mounted.
    pub fn unmount(&mut self, handle: MountHandle) -> bool {
        self.coordinator.unsubscribe(handle);
        self.frames.cancel(handle);
        let dropped_fetch = match self.fetches.remove(&handle) {
            Some(fetch) => {
                fetch.cancelled.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        };
        let Some(mut instance) = self.instances.remove(&handle) else {
            return false;
        };
        instance.stop();
        log::info!(
            "unmounted {} chart {handle}{}",
            instance.kind().name(),
            if dropped_fetch { " (fetch abandoned)" } else { "" }
        );
        true
    }

    /// Viewport resize event. Every subscribed chart refits; charts that want
    /// to animate towards the new layout get a frame request.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport.sanitized();
        for handle in self.coordinator.listeners() {
            if let Some(instance) = self.instances.get_mut(handle) {
                instance.resize(self.viewport);
                if instance.wants_frame() {
                    self.frames.request(*handle);
                }
            }
        }
    }

    /// Run one animation frame. Returns how many charts were ticked.
    pub fn run_frame(&mut self) -> usize {
        let mut ticked = 0;
        for handle in self.frames.take() {
            let Some(instance) = self.instances.get_mut(&handle) else {
                continue;
            };
            ticked += 1;
            if instance.on_frame() {
                self.frames.request(handle);
            }
        }
        ticked
    }

    /// Run frames until nobody asks for one or `max_frames` ran. Returns frames run.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && !self.frames.is_empty() {
            self.run_frame();
            frames += 1;
        }
        frames
    }

    /// Deliver a pointer event. Returns false if `handle` is not mounted.
    pub fn pointer(&mut self, handle: MountHandle, event: PointerEvent) -> bool {
        match self.instances.get_mut(&handle) {
            Some(instance) => {
                instance.on_pointer(event);
                true
            }
            None => false,
        }
    }

    /// Deliver every finished geometry fetch. Returns how many were delivered.
    pub fn pump(&mut self) -> usize {
        let mut done: Vec<(MountHandle, Result<Vec<Region>>)> = Vec::new();
        for (handle, fetch) in &self.fetches {
            match fetch.receiver.try_recv() {
                Ok(result) => done.push((*handle, result)),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => done.push((
                    *handle,
                    Err(VizError::Http("fetch thread ended without a result".into())),
                )),
            }
        }
        let delivered = done.len();
        for (handle, result) in done {
            self.fetches.remove(&handle);
            if let Some(instance) = self.instances.get_mut(&handle) {
                instance.on_geometry(result);
            }
        }
        delivered
    }

    /// Pump until every pending fetch resolved or `timeout` elapsed.
    /// Returns whether nothing is left pending.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.fetches.is_empty() {
                return true;
            }
            if Instant::now() >= deadline {
                log::warn!("{} geometry fetches still pending", self.fetches.len());
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn get(&self, handle: MountHandle) -> Option<&dyn Visualization> {
        self.instances.get(&handle).map(|b| b.as_ref())
    }

    pub fn scene(&self, handle: MountHandle) -> Option<&Scene> {
        self.get(handle).map(|v| v.scene())
    }

    pub fn is_mounted(&self, handle: MountHandle) -> bool {
        self.instances.contains_key(&handle)
    }

    pub fn mounted_count(&self) -> usize {
        self.instances.len()
    }

    pub fn listener_count(&self) -> usize {
        self.coordinator.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_fetches(&self) -> usize {
        self.fetches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_subscribes_once() {
        let mut c = ResizeCoordinator::default();
        let h = MountHandle(7);
        assert!(c.subscribe(h));
        assert!(!c.subscribe(h));
        assert_eq!(c.len(), 1);
        assert!(c.unsubscribe(h));
        assert!(!c.unsubscribe(h));
        assert!(c.is_empty());
    }

    #[test]
    fn frames_are_deduplicated() {
        let mut f = FrameScheduler::default();
        f.request(MountHandle(1));
        f.request(MountHandle(1));
        f.request(MountHandle(2));
        assert_eq!(f.len(), 2);
        assert!(f.cancel(MountHandle(1)));
        assert_eq!(f.take(), vec![MountHandle(2)]);
        assert!(f.is_empty());
    }
}
