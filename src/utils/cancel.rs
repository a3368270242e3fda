// ============================================================================
// CANCEL TOKEN - Cancelación explícita de peticiones en vuelo
// ============================================================================
// Cada ruta montada tiene su token. Al cambiar de ruta la app lo cancela:
// - el transporte aborta el fetch (AbortController)
// - los viewmodels descartan la respuesta en vez de escribir estado
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type CancelHook = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Rc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: Cell<bool>,
    hooks: RefCell<Vec<CancelHook>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Cancelar. Idempotente: los hooks se ejecutan una sola vez.
    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        let hooks: Vec<CancelHook> = self.inner.hooks.borrow_mut().drain(..).collect();
        for hook in hooks {
            hook();
        }
    }

    /// Registrar acción a ejecutar al cancelar (inmediata si ya está cancelado)
    pub fn on_cancel<F>(&self, hook: F)
    where
        F: FnOnce() + 'static,
    {
        if self.is_cancelled() {
            hook();
        } else {
            self.inner.hooks.borrow_mut().push(Box::new(hook));
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hooks_run_once_on_cancel() {
        let token = CancelToken::new();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        token.on_cancel(move || counter.set(counter.get() + 1));

        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn hook_registered_after_cancel_runs_immediately() {
        let token = CancelToken::new();
        token.cancel();

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        token.on_cancel(move || flag.set(true));
        assert!(ran.get());
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
