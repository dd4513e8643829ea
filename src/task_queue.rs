/*
 * Ready queue for work deferred to a later iteration of the window's message loop.
 *
 * Everything runs on the thread that owns the window. A task posted from inside message
 * handling never runs inline: it waits until the backend pumps the queue, which it does
 * when woken through the hook installed with `set_wake_hook` (a posted message for
 * immediate tasks, a timer for delayed ones). Due tasks run in FIFO order of their
 * deadlines, ties broken by posting order.
 */

use std::cell::{Cell, RefCell};

pub type Task = Box<dyn FnOnce()>;

struct PendingTask {
    due_ms: u64,
    sequence: u64,
    task: Task,
}

#[derive(Default)]
pub struct TaskQueue {
    pending: RefCell<Vec<PendingTask>>,
    next_sequence: Cell<u64>,
    last_now_ms: Cell<u64>,
    wake_hook: RefCell<Option<Box<dyn Fn(u32)>>>,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the callback told how soon (in milliseconds) the queue wants pumping.
    pub fn set_wake_hook(&self, hook: Box<dyn Fn(u32)>) {
        *self.wake_hook.borrow_mut() = Some(hook);
    }

    pub fn post(&self, task: Task) {
        self.enqueue(self.last_now_ms.get(), task);
        self.wake(0);
    }

    pub fn post_delayed(&self, delay_ms: u32, now_ms: u64, task: Task) {
        self.last_now_ms.set(self.last_now_ms.get().max(now_ms));
        self.enqueue(now_ms + u64::from(delay_ms), task);
        self.wake(delay_ms);
    }

    /*
     * Runs every task due at `now_ms`. The due set is fixed before the first task runs,
     * so tasks posted while draining wait for the next call. No borrow of the queue is
     * held while a task runs.
     */
    pub fn run_due(&self, now_ms: u64) -> usize {
        self.last_now_ms.set(self.last_now_ms.get().max(now_ms));
        let due: Vec<PendingTask> = {
            let mut pending = self.pending.borrow_mut();
            pending.sort_by_key(|t| (t.due_ms, t.sequence));
            let split = pending.partition_point(|t| t.due_ms <= now_ms);
            pending.drain(..split).collect()
        };
        let count = due.len();
        for pending in due {
            (pending.task)();
        }
        if let Some(deadline) = self.next_deadline() {
            self.wake(deadline.saturating_sub(now_ms).min(u64::from(u32::MAX)) as u32);
        }
        count
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.borrow().iter().map(|t| t.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    fn enqueue(&self, due_ms: u64, task: Task) {
        let sequence = self.next_sequence.get();
        self.next_sequence.set(sequence + 1);
        self.pending.borrow_mut().push(PendingTask {
            due_ms,
            sequence,
            task,
        });
    }

    fn wake(&self, delay_ms: u32) {
        if let Some(hook) = self.wake_hook.borrow().as_ref() {
            hook(delay_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn posted_tasks_run_in_fifo_order() {
        let queue = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            queue.post(Box::new(move || log.borrow_mut().push(i)));
        }

        let ran = queue.run_due(0);

        assert_eq!(ran, 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn delayed_task_waits_for_deadline() {
        let queue = TaskQueue::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        queue.post_delayed(500, 1_000, Box::new(move || flag.set(true)));

        assert_eq!(queue.run_due(1_499), 0);
        assert!(!fired.get());
        assert_eq!(queue.next_deadline(), Some(1_500));

        assert_eq!(queue.run_due(1_500), 1);
        assert!(fired.get());
    }

    #[test]
    fn task_posted_while_draining_runs_on_next_drain() {
        let queue = Rc::new(TaskQueue::new());
        let inner_ran = Rc::new(Cell::new(false));
        let q = Rc::clone(&queue);
        let flag = Rc::clone(&inner_ran);
        queue.post(Box::new(move || {
            q.post(Box::new(move || flag.set(true)));
        }));

        assert_eq!(queue.run_due(0), 1);
        assert!(!inner_ran.get());
        assert_eq!(queue.run_due(0), 1);
        assert!(inner_ran.get());
    }

    #[test]
    fn wake_hook_receives_delays() {
        let queue = TaskQueue::new();
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        queue.set_wake_hook(Box::new(move |delay| sink.borrow_mut().push(delay)));

        queue.post(Box::new(|| {}));
        queue.post_delayed(250, 0, Box::new(|| {}));

        assert_eq!(*requests.borrow(), vec![0, 250]);
    }
}
