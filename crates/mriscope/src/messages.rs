use std::path::PathBuf;

use crate::backend::{AuthForm, AuthReply, Credentials, TumorInfo, UploadReply};
use crate::error::Result;
use crate::preview::{Preview, SelectedFile};

/// Commands sent from the UI thread to the request worker.
pub enum WorkerCommand {
    /// Read and decode a picked file for preview.
    LoadFile { path: PathBuf },

    /// `POST /upload`.
    Classify { file: SelectedFile },

    /// `GET /get_tumor_info`.
    FetchInfo { label: String },

    /// `POST /signup` or `POST /login`.
    Authenticate {
        form: AuthForm,
        credentials: Credentials,
    },
}

impl WorkerCommand {
    /// Short name used for request thread names and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerCommand::LoadFile { .. } => "load",
            WorkerCommand::Classify { .. } => "upload",
            WorkerCommand::FetchInfo { .. } => "info",
            WorkerCommand::Authenticate { .. } => "auth",
        }
    }
}

/// Results sent from the worker back to the UI thread.
pub enum WorkerResult {
    FileLoaded {
        file: SelectedFile,
        preview: Option<Preview>,
    },
    FileFailed {
        path: PathBuf,
        message: String,
    },
    Classified(Result<UploadReply>),
    Info {
        label: String,
        reply: Result<TumorInfo>,
    },
    Authenticated {
        form: AuthForm,
        username: String,
        reply: Result<AuthReply>,
    },
}
