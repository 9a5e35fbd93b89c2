//! Runtime bridge between UI command queue and the form controller.

use std::{path::PathBuf, sync::Arc, thread};

use client_core::{
    FieldCache, FileFieldCache, FormController, FormEvent, HttpRegistrationApi, MemoryFieldCache,
    Settings, SubmitAttempt,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ChannelSurface, UiEvent};

const CACHE_FILE_NAME: &str = "form_cache.json";

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "Verwerking kon niet starten: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let api = match HttpRegistrationApi::from_settings(&settings) {
                Ok(api) => api,
                Err(err) => {
                    tracing::error!("invalid server configuration: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                        "Ongeldige serverinstelling: {err}"
                    )));
                    return;
                }
            };
            tracing::info!(endpoint = %api.endpoint(), "backend worker ready");

            let mut controller = FormController::new(
                ChannelSurface::new(ui_tx),
                Arc::new(api),
                open_field_cache(&settings),
                settings.controller_config(),
            );

            while let Ok(cmd) = cmd_rx.recv() {
                let event = FormEvent::from(cmd);
                if let Some(SubmitAttempt::Completed(outcome)) = controller.dispatch(event).await {
                    tracing::info!(?outcome, "submission attempt finished");
                }
            }
            tracing::debug!("command queue closed; backend worker stopping");
        });
    });
}

fn open_field_cache(settings: &Settings) -> Box<dyn FieldCache> {
    match cache_path(settings) {
        Some(path) => {
            let cache = FileFieldCache::open(path);
            tracing::debug!(path = %cache.path().display(), "using file-backed field cache");
            Box::new(cache)
        }
        None => {
            tracing::warn!("no local data directory; field values are kept in memory only");
            Box::new(MemoryFieldCache::new())
        }
    }
}

fn cache_path(settings: &Settings) -> Option<PathBuf> {
    settings.cache_path.clone().or_else(|| {
        dirs::data_local_dir().map(|base| base.join("bbq_signup").join(CACHE_FILE_NAME))
    })
}
