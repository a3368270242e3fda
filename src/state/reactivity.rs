// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Lista de subscribers compartida entre clones de un store
#[derive(Clone, Default)]
pub struct Subscribers {
    callbacks: Rc<RefCell<Vec<Callback>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers.
    /// Se copia la lista antes: un callback puede suscribir a otro.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self.callbacks.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
