use log::info;

pub type TaskID = i32;

/// A unit of work driven repeatedly by the thread manager. Returning `false`
/// stops the task's thread.
pub trait SteppableTask: Send + 'static {
    fn step(&mut self) -> bool;
}

/// Runs each registered task on its own thread at a fixed period. The first
/// step executes immediately; later steps are spaced by the period, with the
/// base reset if a step overruns. One task per thread means consecutive steps
/// of the same task can never overlap.
pub struct ThreadManager {
    current_task_id: TaskID,
    tasks: std::collections::HashMap<TaskID, ManagedTask>,
}

impl ThreadManager {
    #[must_use]
    pub fn new() -> Self {
        ThreadManager {
            current_task_id: 0,
            tasks: std::collections::HashMap::new(),
        }
    }

    /// Spawns a thread stepping `task` every `period`.
    ///
    /// # Panics
    ///
    /// Will panic if the thread does not spawn successfully.
    pub fn add_task<T>(&mut self, task: T, period: std::time::Duration) -> TaskID
    where
        T: SteppableTask,
    {
        let id = self.current_task_id;

        let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name(std::any::type_name::<T>().to_string())
            .spawn(move || {
                run_task_with_period(task, period, &stop_receiver);
            })
            .expect("Failed to spawn thread");

        self.tasks.insert(
            id,
            ManagedTask {
                handle,
                stop_sender,
            },
        );
        self.current_task_id += 1;
        id
    }

    pub fn stop_all_tasks(&self) {
        info!("ThreadManager: Signaling all tasks to stop...");
        for task in self.tasks.values() {
            let _ = task.stop_sender.send(());
        }
    }

    pub fn wait_on_task_finish(&mut self, task_id: TaskID) {
        if let Some(task) = self.tasks.remove(&task_id) {
            let _ = task.handle.join();
        }
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        ThreadManager::new()
    }
}

fn run_task_with_period<T: SteppableTask>(
    mut task: T,
    period: std::time::Duration,
    stop_receiver: &crossbeam_channel::Receiver<()>,
) {
    let mut next_run = std::time::Instant::now();
    loop {
        if !task.step() {
            break;
        }

        next_run += period;
        let now = std::time::Instant::now();

        if next_run > now {
            let sleep_dur = next_run - now;
            // Wait for timeout (next loop) OR stop signal
            match stop_receiver.recv_timeout(sleep_dur) {
                Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            }
        } else {
            // Reset drift base if the step overran the period
            log::debug!("Task overran its period");
            next_run = now;

            if let Ok(()) = stop_receiver.try_recv() {
                break;
            }
        }
    }
}

struct ManagedTask {
    handle: std::thread::JoinHandle<()>,
    stop_sender: crossbeam_channel::Sender<()>,
}
