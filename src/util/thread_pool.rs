use std::sync::Arc;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use log::{debug, error};

/// A basic thread pool with a constant number of threads.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

/// A job for a thread pool. The job may run on any thread, and will only be run once.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// A message to a thread.
enum Message {
    /// A new job to run.
    NewJob(Job),
    /// Message to tell the thread to return.
    Terminate,
}

impl ThreadPool {
    /// Create a new ThreadPool.
    ///
    /// The size is the number of threads in the pool.
    ///
    /// # Panics
    ///
    /// The `new` function will panic if the size is zero, or if a thread can't be spawned.
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();

        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(new_worker(id, Arc::clone(&receiver)));
        }

        ThreadPool { workers, sender }
    }

    /// Executes the given closure on a thread.
    /// The closure is dropped without running if every worker has stopped.
    pub fn execute<F>(&self, f: F)
        where
            F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f);

        if self.sender.send(Message::NewJob(job)).is_err() {
            error!("no worker left to run job");
        }
    }
}

impl Drop for ThreadPool {
    /// Sends the termination message to all threads in the thread pool and waits for them to return.
    fn drop(&mut self) {
        for _ in &self.workers {
            // a worker that already stopped doesn't need telling
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.take() {
                if thread.join().is_err() {
                    error!("worker thread panicked");
                }
            }
        }
    }
}

/// A worker, represented by a join handler if the thread is still running, or None.
type Worker = Option<thread::JoinHandle<()>>;

/// Creates a new worker with the given receiver end of an mpsc channel.
/// The worker will run until a Terminate message is sent to it through the channel.
fn new_worker(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {
    let thread = thread::Builder::new()
        .name(format!("worker-{}", id))
        .spawn(move || loop {
            let message = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };

            match message {
                Ok(Message::NewJob(job)) => job(),
                Ok(Message::Terminate) | Err(_) => break
            }
        })
        .expect("failed to spawn worker thread");

    debug!("started worker {}", id);
    Some(thread)
}
