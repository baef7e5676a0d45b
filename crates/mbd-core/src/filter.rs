//! Asset filtering: optional per-field constraints over parsed attributes.
//!
//! A selection field of `None` means unconstrained; `Some(value)` requires an
//! exact match against the asset's parsed attribute (including
//! `Some(Unknown)`, which selects assets where the field was not detected).
//! Fields combine with logical AND, so narrowing one field never loosens
//! another.

use crate::attrs::{Arch, AttributeSet, CRuntime, ExceptionModel, RuntimeVersion, ThreadModel};
use crate::release::Asset;

/// User-chosen constraints narrowing which assets are shown. Default is
/// all-unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub arch: Option<Arch>,
    pub threads: Option<ThreadModel>,
    pub exceptions: Option<ExceptionModel>,
    pub crt: Option<CRuntime>,
    pub runtime: Option<RuntimeVersion>,
}

impl FilterSelection {
    /// True iff every constrained field equals the asset's parsed value.
    pub fn matches(&self, attrs: &AttributeSet) -> bool {
        fn field<T: PartialEq>(want: Option<T>, got: T) -> bool {
            match want {
                None => true,
                Some(w) => w == got,
            }
        }

        field(self.arch, attrs.arch)
            && field(self.threads, attrs.threads)
            && field(self.exceptions, attrs.exceptions)
            && field(self.crt, attrs.crt)
            && field(self.runtime, attrs.runtime)
    }
}

/// Holds the current selection and produces filtered views of an asset list.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    selection: FilterSelection,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Replaces the whole selection at once (e.g. from CLI flags).
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    pub fn set_arch(&mut self, arch: Option<Arch>) {
        self.selection.arch = arch;
    }

    pub fn set_threads(&mut self, threads: Option<ThreadModel>) {
        self.selection.threads = threads;
    }

    pub fn set_exceptions(&mut self, exceptions: Option<ExceptionModel>) {
        self.selection.exceptions = exceptions;
    }

    pub fn set_crt(&mut self, crt: Option<CRuntime>) {
        self.selection.crt = crt;
    }

    pub fn set_runtime(&mut self, runtime: Option<RuntimeVersion>) {
        self.selection.runtime = runtime;
    }

    /// Clears every constraint.
    pub fn reset(&mut self) {
        self.selection = FilterSelection::default();
    }

    /// Returns the indices of `assets` matching the current selection, in
    /// original order. Pure: never reorders, never mutates, and repeated
    /// calls with the same inputs yield identical results.
    pub fn apply(&self, assets: &[Asset]) -> Vec<usize> {
        assets
            .iter()
            .enumerate()
            .filter(|(_, a)| self.selection.matches(&a.attrs))
            .map(|(i, _)| i)
            .collect()
    }
}
