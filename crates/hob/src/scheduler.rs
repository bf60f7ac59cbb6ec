// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deferred execution of post-change hooks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after the current synchronous turn has completed.
///
/// Implementations must never run the task inline from `defer`.
pub trait Scheduler {
    fn defer(&self, task: Task);
}

/// Manually drained task queue, used for headless rendering and tests.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        TaskQueue::default()
    }

    /// Run queued tasks, including any queued while running, until the queue
    /// is empty. Returns the number of tasks that ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;

        loop {
            // Borrow must end before the task runs, tasks may defer more tasks.
            let task = self.tasks.borrow_mut().pop_front();

            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Browser microtask scheduling.
#[cfg(feature = "web")]
#[derive(Clone, Copy, Default)]
pub struct NextTick;

#[cfg(feature = "web")]
impl Scheduler for NextTick {
    fn defer(&self, task: Task) {
        wasm_bindgen_futures::spawn_local(async move { task() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn defers_until_drained() {
        let queue = TaskQueue::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        queue.defer(Box::new(move || counter.set(counter.get() + 1)));

        assert_eq!(hits.get(), 0);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(hits.get(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn runs_tasks_queued_by_tasks() {
        let queue = TaskQueue::new();
        let hits = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let counter = hits.clone();
        queue.defer(Box::new(move || {
            let counter = counter.clone();
            inner_queue.defer(Box::new(move || counter.set(counter.get() + 1)));
        }));

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(hits.get(), 1);
    }
}
