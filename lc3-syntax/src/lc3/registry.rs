//! Language registration
//!
//!     A [LanguageDescriptor] bundles everything the host editor needs for one language:
//!     id, file extensions, the line comment prefix, the rule table, the theme and the
//!     fold strategy. Descriptors are immutable once built and shared as `Arc`s.
//!
//!     The [LanguageRegistry] is an explicit object owned by the editor session. Registering
//!     an id that already exists swaps the whole descriptor in one step; code that already
//!     holds the previous `Arc` keeps a consistent view until it lets go.

use crate::lc3::buffer::TokenizedBuffer;
use crate::lc3::dialects::{Dialect, DialectOptions};
use crate::lc3::folding::{FoldProvider, FoldStrategy};
use crate::lc3::rules::{RuleTable, RuleTableError};
use crate::lc3::theme::{Theme, LIGHT};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone)]
pub struct LanguageDescriptor {
    pub id: String,
    pub name: String,
    /// Lower-case, without the leading dot.
    pub file_extensions: Vec<String>,
    pub line_comment_prefix: String,
    pub rules: Arc<RuleTable>,
    pub theme: Theme,
    pub folding: FoldStrategy,
}

impl LanguageDescriptor {
    pub fn new(id: impl Into<String>, rules: RuleTable) -> Self {
        let id = id.into();
        LanguageDescriptor {
            name: id.clone(),
            id,
            file_extensions: Vec::new(),
            line_comment_prefix: String::new(),
            rules: Arc::new(rules),
            theme: LIGHT.clone(),
            folding: FoldStrategy::None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_line_comment(mut self, prefix: impl Into<String>) -> Self {
        self.line_comment_prefix = prefix.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_folding(mut self, folding: FoldStrategy) -> Self {
        self.folding = folding;
        self
    }

    pub fn fold_provider(&self) -> &'static dyn FoldProvider {
        self.folding.provider()
    }

    /// A buffer over `source` tokenized with this language's rules.
    pub fn open(&self, source: &str) -> TokenizedBuffer {
        TokenizedBuffer::from_source(Arc::clone(&self.rules), source)
    }

    pub fn handles_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.file_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

#[derive(Debug, Default)]
struct Registered {
    by_id: HashMap<String, Arc<LanguageDescriptor>>,
    /// Extension -> owning language id.
    by_extension: HashMap<String, String>,
    order: Vec<String>,
}

#[derive(Debug, Default)]
pub struct LanguageRegistry {
    inner: RwLock<Registered>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding both built-in dialects. `lc3` is registered last and so owns
    /// `.asm` until something claims it.
    pub fn with_builtins(options: &DialectOptions) -> Result<Self, RuleTableError> {
        let registry = Self::new();
        for dialect in [Dialect::Lc3Nasm, Dialect::Lc3] {
            registry.register(dialect.descriptor(options)?);
        }
        Ok(registry)
    }

    /// Registers `descriptor`, replacing any language with the same id. Returns the
    /// replaced descriptor. The descriptor's extensions now resolve to it.
    pub fn register(&self, descriptor: LanguageDescriptor) -> Option<Arc<LanguageDescriptor>> {
        let descriptor = Arc::new(descriptor);
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = descriptor.id.clone();

        inner.by_extension.retain(|_, owner| *owner != id);
        for extension in &descriptor.file_extensions {
            inner.by_extension.insert(extension.clone(), id.clone());
        }
        let previous = inner.by_id.insert(id.clone(), descriptor);
        if previous.is_some() {
            debug!("replaced language `{id}`");
        } else {
            debug!("registered language `{id}`");
            inner.order.push(id);
        }
        previous
    }

    /// Makes `extension` resolve to `id`. Returns false if `id` is not registered.
    pub fn claim_extension(&self, extension: &str, id: &str) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.by_id.contains_key(id) {
            return false;
        }
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        debug!("`.{extension}` now opens as `{id}`");
        inner.by_extension.insert(extension, id.to_string());
        true
    }

    pub fn get(&self, id: &str) -> Option<Arc<LanguageDescriptor>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_id.get(id).cloned()
    }

    pub fn for_extension(&self, extension: &str) -> Option<Arc<LanguageDescriptor>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        inner
            .by_extension
            .get(&extension)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    pub fn for_path(&self, path: &Path) -> Option<Arc<LanguageDescriptor>> {
        let extension = path.extension()?.to_str()?;
        self.for_extension(extension)
    }

    /// Registered descriptors in registration order.
    pub fn languages(&self) -> Vec<Arc<LanguageDescriptor>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }
}
