//! Single-writer coordinator for the student collection.
//!
//! # Responsibility
//! - Own one repository on a dedicated thread.
//! - Process list/get/create/update/delete/clear requests strictly one at a time.
//!
//! # Invariants
//! - No two read-modify-write cycles on the owned repository overlap, so
//!   concurrent callers cannot lose each other's updates.
//! - Requests are served in the order they reach the channel.
//! - After shutdown every handle call fails with `WriterError::Closed`.

use crate::model::student::{Student, StudentDraft};
use crate::repo::student_repo::StudentRepository;
use crate::service::student_service::{ServiceError, ServiceResult, StudentService};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "studentbook-writer";

pub type WriterResult<T> = Result<T, WriterError>;

/// Error returned through a `StoreHandle`.
#[derive(Debug)]
pub enum WriterError {
    /// Worker thread is gone; the request was not executed.
    Closed,
    /// Worker thread could not be started.
    Spawn(std::io::Error),
    /// Request executed and failed.
    Service(ServiceError),
}

impl Display for WriterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "student store writer is closed"),
            Self::Spawn(err) => write!(f, "failed to start student store writer: {err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WriterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Closed => None,
            Self::Spawn(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<ServiceError> for WriterError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

type Reply<T> = Sender<ServiceResult<T>>;

enum Request {
    List(Reply<Vec<Student>>),
    Get(String, Reply<Option<Student>>),
    Create(StudentDraft, Reply<Student>),
    Update(Student, Reply<()>),
    Delete(String, Reply<()>),
    Clear(Reply<()>),
    Shutdown,
}

/// Owner of the worker thread. Dropping it stops the worker.
pub struct StoreWriter {
    handle: StoreHandle,
    worker: Option<JoinHandle<()>>,
}

impl StoreWriter {
    /// Moves `repo` onto a new worker thread.
    pub fn spawn<R>(repo: R) -> WriterResult<Self>
    where
        R: StudentRepository + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(StudentService::new(repo), rx))
            .map_err(WriterError::Spawn)?;

        info!("event=writer_start module=service status=ok");
        Ok(Self {
            handle: StoreHandle { tx },
            worker: Some(worker),
        })
    }

    /// Returns a cloneable handle for submitting requests.
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Stops the worker after already-queued requests and waits for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        // Send fails only when the worker already exited.
        let _ = self.handle.tx.send(Request::Shutdown);
        if worker.join().is_err() {
            error!("event=writer_stop module=service status=error error_code=worker_panicked");
            return;
        }
        info!("event=writer_stop module=service status=ok");
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cloneable, thread-safe client of a `StoreWriter`.
#[derive(Clone)]
pub struct StoreHandle {
    tx: Sender<Request>,
}

impl StoreHandle {
    pub fn list_students(&self) -> WriterResult<Vec<Student>> {
        self.call(Request::List)
    }

    pub fn get_student(&self, id: impl Into<String>) -> WriterResult<Option<Student>> {
        let id = id.into();
        self.call(|reply| Request::Get(id, reply))
    }

    pub fn create_student(&self, draft: StudentDraft) -> WriterResult<Student> {
        self.call(|reply| Request::Create(draft, reply))
    }

    pub fn update_student(&self, student: Student) -> WriterResult<()> {
        self.call(|reply| Request::Update(student, reply))
    }

    pub fn delete_student(&self, id: impl Into<String>) -> WriterResult<()> {
        let id = id.into();
        self.call(|reply| Request::Delete(id, reply))
    }

    pub fn clear_students(&self) -> WriterResult<()> {
        self.call(Request::Clear)
    }

    fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> WriterResult<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| WriterError::Closed)?;
        let result = reply_rx.recv().map_err(|_| WriterError::Closed)?;
        Ok(result?)
    }
}

fn run_worker<R: StudentRepository>(service: StudentService<R>, rx: Receiver<Request>) {
    for request in rx {
        // A dropped reply receiver means the caller gave up; nothing to report.
        match request {
            Request::List(reply) => {
                let _ = reply.send(service.list_students());
            }
            Request::Get(id, reply) => {
                let _ = reply.send(service.get_student(&id));
            }
            Request::Create(draft, reply) => {
                let _ = reply.send(service.create_student(&draft));
            }
            Request::Update(student, reply) => {
                let _ = reply.send(service.update_student(&student));
            }
            Request::Delete(id, reply) => {
                let _ = reply.send(service.delete_student(&id));
            }
            Request::Clear(reply) => {
                let _ = reply.send(service.clear_students());
            }
            Request::Shutdown => break,
        }
    }
}
