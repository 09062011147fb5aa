use std::sync::{mpsc, Arc};

use tracing::{debug, error, warn};

use crate::backend::Backend;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::preview::{Preview, SelectedFile};

/// Spawn the request dispatcher. Every command runs on its own thread, so a
/// slow upload never holds back an info fetch or a login. `wake` runs after
/// every result is queued so the UI can repaint. Returns the command sender.
pub fn spawn_worker<B>(
    backend: B,
    result_tx: mpsc::Sender<WorkerResult>,
    wake: impl Fn() + Send + Sync + 'static,
) -> std::io::Result<mpsc::Sender<WorkerCommand>>
where
    B: Backend + Send + Sync + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
    let backend = Arc::new(backend);
    let wake: Arc<dyn Fn() + Send + Sync> = Arc::new(wake);

    std::thread::Builder::new()
        .name("mriscope-worker".into())
        .spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                let kind = cmd.kind();
                let backend = Arc::clone(&backend);
                let result_tx = result_tx.clone();
                let wake = Arc::clone(&wake);
                let spawned = std::thread::Builder::new()
                    .name(format!("mriscope-{kind}"))
                    .spawn(move || {
                        let result = execute(backend.as_ref(), cmd);
                        if result_tx.send(result).is_ok() {
                            wake();
                        }
                    });
                if let Err(e) = spawned {
                    error!(kind, "could not start request thread: {e}");
                }
            }
            debug!("worker channel closed");
        })?;

    Ok(cmd_tx)
}

/// Run one command to completion on the calling thread.
pub fn execute(backend: &dyn Backend, cmd: WorkerCommand) -> WorkerResult {
    match cmd {
        WorkerCommand::LoadFile { path } => match SelectedFile::read(&path) {
            Ok(file) => {
                let preview = Preview::decode(&file)
                    .inspect_err(|e| warn!(file = %file.name, "preview decode failed: {e}"))
                    .ok();
                WorkerResult::FileLoaded { file, preview }
            }
            Err(e) => WorkerResult::FileFailed {
                path,
                message: e.to_string(),
            },
        },
        WorkerCommand::Classify { file } => WorkerResult::Classified(backend.classify(&file)),
        WorkerCommand::FetchInfo { label } => {
            let reply = backend.tumor_info(&label);
            WorkerResult::Info { label, reply }
        }
        WorkerCommand::Authenticate { form, credentials } => {
            let reply = backend.authenticate(form, &credentials);
            WorkerResult::Authenticated {
                form,
                username: credentials.username,
                reply,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::backend::{AuthForm, AuthReply, Backend, Credentials, TumorInfo, UploadReply};
    use crate::error::{ClientError, Result};
    use crate::preview::SelectedFile;

    /// Backend answering from canned replies and recording every call.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub upload: Option<UploadReply>,
        pub info: Option<String>,
        pub auth: Option<AuthReply>,
        /// Time each upload takes before answering.
        pub upload_delay: Duration,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Backend for ScriptedBackend {
        fn classify(&self, file: &SelectedFile) -> Result<UploadReply> {
            self.record(format!("upload {}", file.name));
            std::thread::sleep(self.upload_delay);
            self.upload
                .clone()
                .ok_or_else(|| ClientError::Decode("no upload scripted".into()))
        }

        fn tumor_info(&self, label: &str) -> Result<TumorInfo> {
            self.record(format!("info {label}"));
            self.info
                .clone()
                .map(|info| TumorInfo { info })
                .ok_or(ClientError::Status(500))
        }

        fn authenticate(&self, form: AuthForm, credentials: &Credentials) -> Result<AuthReply> {
            self.record(format!("{} {}", form.endpoint(), credentials.username));
            self.auth
                .clone()
                .ok_or_else(|| ClientError::Decode("no auth scripted".into()))
        }
    }
}
