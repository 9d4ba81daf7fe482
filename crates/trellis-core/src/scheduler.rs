//! Tick queue for deferred, coalesced work.
//!
//! Hosts embedding Trellis drive a frame loop. Work that should happen "before
//! the next frame" - relayout after a resize, repagination after items change -
//! is registered here once and then scheduled whenever it becomes dirty.
//! Repeated schedule requests for the same task coalesce into a single run,
//! so a burst of resize events costs one relayout, not dozens.
//!
//! # Example
//!
//! ```
//! use trellis_core::TickQueue;
//!
//! let mut queue = TickQueue::new();
//! let relayout = queue.register(|| {
//!     // recompute geometry here
//! });
//!
//! assert!(queue.schedule(relayout).unwrap());
//! assert!(!queue.schedule(relayout).unwrap()); // coalesced with the first
//!
//! // The host calls this once per frame.
//! assert_eq!(queue.run_pending(), 1);
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};

new_key_type! {
    /// A unique identifier for a registered tick task.
    pub struct TickTaskId;
}

/// A boxed task closure.
type BoxedTickTask = Box<dyn FnMut() + Send + 'static>;

/// Internal registered task data.
struct TickTaskData {
    /// Whether this task is queued for the next flush.
    pending: bool,
    /// The task closure to execute.
    task: BoxedTickTask,
}

/// Manages deferred tasks that run on the host's next tick.
///
/// Tasks are registered once and keep their [`TickTaskId`] for their whole
/// lifetime. Scheduling marks a task to run on the next [`run_pending`]
/// flush; scheduling an already-pending task is a no-op, which is what makes
/// repeated invalidations cheap.
///
/// [`run_pending`]: TickQueue::run_pending
pub struct TickQueue {
    /// All registered tasks.
    tasks: SlotMap<TickTaskId, TickTaskData>,
    /// Pending task executions in request order.
    order: Vec<TickTaskId>,
}

impl TickQueue {
    /// Create a new, empty tick queue.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a task and return its ID.
    ///
    /// Registration does not schedule the task; call [`schedule`](Self::schedule)
    /// whenever the work it performs becomes necessary.
    pub fn register<F>(&mut self, task: F) -> TickTaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.tasks.insert(TickTaskData {
            pending: false,
            task: Box::new(task),
        })
    }

    /// Remove a task entirely.
    ///
    /// Any pending execution is dropped with it. Returns an error if the ID
    /// is unknown.
    pub fn unregister(&mut self, id: TickTaskId) -> Result<()> {
        if self.tasks.remove(id).is_some() {
            // A stale entry may remain in `order`; the flush skips it.
            Ok(())
        } else {
            Err(SchedulerError::InvalidTaskId.into())
        }
    }

    /// Queue a task to run on the next flush.
    ///
    /// Returns `Ok(true)` if the task was newly queued, `Ok(false)` if it was
    /// already pending (the requests coalesce), or an error if the ID is
    /// unknown.
    pub fn schedule(&mut self, id: TickTaskId) -> Result<bool> {
        let Some(task_data) = self.tasks.get_mut(id) else {
            return Err(SchedulerError::InvalidTaskId.into());
        };

        if task_data.pending {
            tracing::trace!(target: "trellis_core::tick", ?id, "schedule coalesced");
            return Ok(false);
        }

        task_data.pending = true;
        self.order.push(id);
        Ok(true)
    }

    /// Withdraw a pending execution without unregistering the task.
    ///
    /// Returns `Ok(true)` if the task had been pending, or an error if the
    /// ID is unknown.
    pub fn cancel(&mut self, id: TickTaskId) -> Result<bool> {
        let Some(task_data) = self.tasks.get_mut(id) else {
            return Err(SchedulerError::InvalidTaskId.into());
        };

        let was_pending = task_data.pending;
        task_data.pending = false;
        Ok(was_pending)
    }

    /// Check whether a task is queued for the next flush.
    pub fn is_pending(&self, id: TickTaskId) -> bool {
        self.tasks.get(id).is_some_and(|t| t.pending)
    }

    /// The number of tasks queued for the next flush.
    pub fn pending_count(&self) -> usize {
        self.tasks.values().filter(|t| t.pending).count()
    }

    /// The number of registered tasks.
    pub fn registered_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run every pending task once, in the order their requests arrived.
    ///
    /// Returns the number of tasks that were executed. Entries whose task was
    /// unregistered or cancelled after scheduling are skipped.
    #[tracing::instrument(skip(self), target = "trellis_core::tick", level = "trace")]
    pub fn run_pending(&mut self) -> usize {
        let order = std::mem::take(&mut self.order);
        let mut executed_count = 0;

        for id in order {
            // The task may have been unregistered since it was queued.
            let Some(task_data) = self.tasks.get_mut(id) else {
                continue;
            };

            // Cancelled entries stay in `order` and are dropped here.
            if !task_data.pending {
                continue;
            }

            task_data.pending = false;
            tracing::trace!(target: "trellis_core::tick", ?id, "running tick task");
            (task_data.task)();
            executed_count += 1;
        }

        executed_count
    }
}

impl Default for TickQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_schedule_and_run() {
        let mut queue = TickQueue::new();
        let executed = Arc::new(AtomicUsize::new(0));
        let executed_clone = executed.clone();

        let id = queue.register(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(queue.registered_count(), 1);
        assert!(!queue.is_pending(id));

        // Nothing runs before it is scheduled.
        assert_eq!(queue.run_pending(), 0);
        assert_eq!(executed.load(Ordering::SeqCst), 0);

        assert!(queue.schedule(id).unwrap());
        assert!(queue.is_pending(id));
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(executed.load(Ordering::SeqCst), 1);
        assert!(!queue.is_pending(id));
    }

    #[test]
    fn test_repeated_schedules_coalesce() {
        let mut queue = TickQueue::new();
        let executed = Arc::new(AtomicUsize::new(0));
        let executed_clone = executed.clone();

        let id = queue.register(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(queue.schedule(id).unwrap());
        assert!(!queue.schedule(id).unwrap());
        assert!(!queue.schedule(id).unwrap());
        assert_eq!(queue.pending_count(), 1);

        // Three requests, one execution.
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(executed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_task_can_run_again_after_flush() {
        let mut queue = TickQueue::new();
        let executed = Arc::new(AtomicUsize::new(0));
        let executed_clone = executed.clone();

        let id = queue.register(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.schedule(id).unwrap();
        queue.run_pending();
        queue.schedule(id).unwrap();
        queue.run_pending();

        assert_eq!(executed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancel_pending() {
        let mut queue = TickQueue::new();
        let executed = Arc::new(AtomicUsize::new(0));
        let executed_clone = executed.clone();

        let id = queue.register(move || {
            executed_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.schedule(id).unwrap();
        assert!(queue.cancel(id).unwrap());
        assert!(!queue.cancel(id).unwrap());

        assert_eq!(queue.run_pending(), 0);
        assert_eq!(executed.load(Ordering::SeqCst), 0);

        // The task survives cancellation and can be scheduled again.
        queue.schedule(id).unwrap();
        assert_eq!(queue.run_pending(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut queue = TickQueue::new();
        let id = queue.register(|| {});

        queue.schedule(id).unwrap();
        queue.unregister(id).unwrap();

        assert_eq!(queue.registered_count(), 0);
        assert_eq!(queue.run_pending(), 0);

        // Operations on a removed ID fail.
        assert!(queue.unregister(id).is_err());
        assert!(queue.schedule(id).is_err());
        assert!(queue.cancel(id).is_err());
        assert!(!queue.is_pending(id));
    }

    #[test]
    fn test_tasks_run_in_request_order() {
        let mut queue = TickQueue::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let order1 = order.clone();
        let first = queue.register(move || order1.lock().push(1));
        let order2 = order.clone();
        let second = queue.register(move || order2.lock().push(2));
        let order3 = order.clone();
        let third = queue.register(move || order3.lock().push(3));

        // Request in an order different from registration.
        queue.schedule(second).unwrap();
        queue.schedule(third).unwrap();
        queue.schedule(first).unwrap();

        queue.run_pending();
        assert_eq!(*order.lock(), vec![2, 3, 1]);
    }

    #[test]
    fn test_flush_skips_tasks_registered_but_never_scheduled() {
        let mut queue = TickQueue::new();
        let executed = Arc::new(AtomicUsize::new(0));

        let executed_a = executed.clone();
        let a = queue.register(move || {
            executed_a.fetch_add(1, Ordering::SeqCst);
        });
        let executed_b = executed.clone();
        let _b = queue.register(move || {
            executed_b.fetch_add(1, Ordering::SeqCst);
        });

        queue.schedule(a).unwrap();
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(executed.load(Ordering::SeqCst), 1);
    }
}
