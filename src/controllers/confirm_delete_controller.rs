//! Diálogo de confirmación de borrado
//!
//! El gate envuelve una acción destructiva: `activate` abre el diálogo,
//! `confirm` ejecuta la acción y `cancel` lo cierra sin efectos. Mientras
//! la acción está en curso se rechaza cualquier otra confirmación. El gate
//! nunca llama a la red por sí mismo.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::utils::errors::{internal_error, AppError, AppResult};

pub const DELETE_TITLE: &str = "Você deseja remover ?";
pub const DELETE_DESCRIPTION: &str =
    "Esta ação não pode ser revertida. Uma vez feita, o dado será removido do sistema.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Confirming,
    Deleting,
}

#[derive(Debug)]
pub struct DeleteGate {
    state: Mutex<GateState>,
}

impl Default for DeleteGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
        }
    }

    pub fn title(&self) -> &'static str {
        DELETE_TITLE
    }

    pub fn description(&self) -> &'static str {
        DELETE_DESCRIPTION
    }

    pub fn state(&self) -> GateState {
        *self.lock()
    }

    /// Label del botón de confirmación
    pub fn confirm_label(&self) -> &'static str {
        match self.state() {
            GateState::Deleting => "Deletando",
            _ => "Confirmar",
        }
    }

    pub fn activate(&self) {
        let mut state = self.lock();
        if *state == GateState::Closed {
            *state = GateState::Confirming;
        }
    }

    /// Cerrar el diálogo sin efectos; no interrumpe un borrado en curso
    pub fn cancel(&self) {
        let mut state = self.lock();
        if *state == GateState::Confirming {
            *state = GateState::Closed;
        }
    }

    /// Ejecutar la acción confirmada; el gate vuelve a `Closed` con éxito o error
    pub async fn confirm<F, Fut, T>(&self, action: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        {
            let mut state = self.lock();
            match *state {
                GateState::Confirming => *state = GateState::Deleting,
                GateState::Deleting => {
                    debug!("Confirmación ignorada: borrado en curso");
                    return Err(AppError::Busy("exclusão em andamento".to_string()));
                }
                GateState::Closed => {
                    return Err(internal_error("diálogo de exclusão não está aberto"));
                }
            }
        }

        let _reset = ResetOnDrop(self);
        action().await
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Vuelve a `Closed` también si el futuro se cancela a mitad
struct ResetOnDrop<'a>(&'a DeleteGate);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0.lock() = GateState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_confirm_runs_action_and_closes() {
        let gate = DeleteGate::new();
        gate.activate();
        assert_eq!(gate.state(), GateState::Confirming);

        let value = gate.confirm(|| async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(gate.state(), GateState::Closed);
    }

    #[tokio::test]
    async fn test_failure_also_closes() {
        let gate = DeleteGate::new();
        gate.activate();
        let result: AppResult<()> = gate
            .confirm(|| async { Err(AppError::NotFound("freight 42".to_string())) })
            .await;
        assert!(result.is_err());
        assert_eq!(gate.state(), GateState::Closed);
    }

    #[test]
    fn test_cancel_has_no_side_effects() {
        let gate = DeleteGate::new();
        gate.activate();
        gate.cancel();
        assert_eq!(gate.state(), GateState::Closed);
        assert_eq!(gate.title(), "Você deseja remover ?");
    }

    #[tokio::test]
    async fn test_second_confirm_while_deleting_is_rejected() {
        let gate = DeleteGate::new();
        let calls = AtomicUsize::new(0);
        gate.activate();

        let (first, second) = tokio::join!(
            gate.confirm(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(())
            }),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                assert_eq!(gate.confirm_label(), "Deletando");
                gate.confirm(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
            }
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Busy(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_confirm_without_activate_is_rejected() {
        let gate = DeleteGate::new();
        let result = gate.confirm(|| async { Ok(()) }).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
