use serde::{Deserialize, Serialize};
use std::fmt;

const RESOURCES_SUFFIX: &str = ".resources";

/// A single "cannot resolve this name" callback from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// Raw requested name, possibly qualified: `Foo, Version=1.0.0.0, Culture=neutral`
    pub requested_name: String,
    /// Identity of the module that triggered the request, for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requesting_module: Option<String>,
}

impl ResolutionRequest {
    pub fn new(requested_name: impl Into<String>) -> Self {
        Self {
            requested_name: requested_name.into(),
            requesting_module: None,
        }
    }

    pub fn with_requesting_module(mut self, module: impl Into<String>) -> Self {
        self.requesting_module = Some(module.into());
        self
    }

    /// The part of the requested name before the first comma
    pub fn simple_name(&self) -> &str {
        match self.requested_name.split_once(',') {
            Some((simple, _)) => simple.trim(),
            None => self.requested_name.trim(),
        }
    }

    /// Satellite resource requests (`Foo.resources`, `Foo.resources.dll`) are
    /// never resolved here
    pub fn is_resource_request(&self) -> bool {
        let simple = self.simple_name().to_lowercase();
        simple.match_indices(RESOURCES_SUFFIX).any(|(at, _)| {
            let rest = &simple[at + RESOURCES_SUFFIX.len()..];
            at > 0 && (rest.is_empty() || rest.starts_with('.'))
        })
    }
}

impl fmt::Display for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requesting_module {
            Some(requesting) => write!(f, "{} (requested by {})", self.requested_name, requesting),
            None => write!(f, "{}", self.requested_name),
        }
    }
}

/// The short, version-independent name candidates are matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchName {
    name: String,
    probably_script_origin: bool,
}

impl SearchName {
    /// Derive the search name from a request.
    ///
    /// Qualified requests keep the part before the first comma. Bare requests
    /// come from scripts, which ask for things like `MyFunctions.dll`: a known
    /// module extension is stripped and the working directory joins the search.
    /// Returns `None` when nothing usable remains.
    pub fn from_request(request: &ResolutionRequest, extensions: &[String]) -> Option<Self> {
        let raw = request.requested_name.trim();
        let (name, probably_script_origin) = match raw.split_once(',') {
            Some((simple, _)) => (simple.trim().to_string(), false),
            None => (strip_module_extension(raw, extensions).to_string(), true),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            probably_script_origin,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn probably_script_origin(&self) -> bool {
        self.probably_script_origin
    }

    /// Leading characters every plausible candidate file name must contain
    pub fn required_prefix(&self, len: usize) -> &str {
        match self.name.char_indices().nth(len) {
            Some((end, _)) => &self.name[..end],
            None => &self.name,
        }
    }
}

impl fmt::Display for SearchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn strip_module_extension<'a>(name: &'a str, extensions: &[String]) -> &'a str {
    for ext in extensions {
        let suffix_len = ext.len() + 1;
        if name.len() <= suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
            continue;
        }
        let (stem, suffix) = name.split_at(name.len() - suffix_len);
        if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ext) {
            return stem;
        }
    }
    name
}
