//! Resolver facade
//!
//! Entry point the host calls when it cannot find a module by itself. One
//! `Resolver` owns every piece of mutable state (registered locations, both
//! contexts and their caches), so separate instances are fully independent.

use crate::{
    config::ResolverConfig,
    context::{LoadAttempt, ResolutionContext},
    diagnostics::DiagnosticLog,
    discovery::{CandidateEnumerator, SearchLocations},
    error::{Error, Result},
    interfaces::{ModuleInspector, ModuleLoader, SearchRootProvider},
    loaded_index::LoadedModuleIndex,
    ranking::{CandidateSnapshot, FuzzyRanker},
    services::{ConfiguredSearchRoots, ContainerInspector, ContainerLoader},
    types::{ContextKind, LoadedModule, ModuleHandle, ResolutionRequest, SearchName},
    utils::{contains_ignore_case, eq_ignore_case},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Resolver {
    config: ResolverConfig,
    roots: Box<dyn SearchRootProvider>,
    inspector: Box<dyn ModuleInspector>,
    locations: SearchLocations,
    ranker: FuzzyRanker,
    normal: ResolutionContext,
    metadata_only: ResolutionContext,
    host_normal: ModuleHandle,
    host_metadata_only: ModuleHandle,
    diagnostics: Option<DiagnosticLog>,
}

impl Resolver {
    /// Resolver over the default container services
    pub fn new(config: ResolverConfig) -> Result<Self> {
        ResolverBuilder::new(config).build()
    }

    pub fn builder(config: ResolverConfig) -> ResolverBuilder {
        ResolverBuilder::new(config)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn context(&self, kind: ContextKind) -> &ResolutionContext {
        match kind {
            ContextKind::Normal => &self.normal,
            ContextKind::MetadataOnly => &self.metadata_only,
        }
    }

    /// The host's own module as seen from a context
    pub fn host_module(&self, kind: ContextKind) -> ModuleHandle {
        match kind {
            ContextKind::Normal => Arc::clone(&self.host_normal),
            ContextKind::MetadataOnly => Arc::clone(&self.host_metadata_only),
        }
    }

    pub fn search_locations(&self) -> &SearchLocations {
        &self.locations
    }

    /// Add a folder searched (top-level only) by every later resolution
    pub fn register_search_folder(&self, folder: impl AsRef<Path>) -> bool {
        self.locations.add_folder(folder.as_ref())
    }

    /// Add a single module file considered by every later resolution
    pub fn register_search_file(&self, file: impl AsRef<Path>) -> bool {
        self.locations.add_file(file.as_ref())
    }

    /// Resolve a request in one context. `None` means the dependency is
    /// unavailable; it is never an error.
    pub fn resolve(&self, request: &ResolutionRequest, kind: ContextKind) -> Option<ModuleHandle> {
        let outcome = self.resolve_in(request, self.context(kind));
        if let Some(log) = &self.diagnostics {
            log.record(request, kind, outcome.as_ref());
        }
        outcome
    }

    /// The ranked candidates a resolution would try, without loading or caching
    pub fn candidates(&self, request: &ResolutionRequest, kind: ContextKind) -> Vec<CandidateSnapshot> {
        if request.is_resource_request() {
            return Vec::new();
        }
        let Some(search) = self.search_name(request) else {
            return Vec::new();
        };
        let context = self.context(kind);
        self.rank_candidates(&search, &context.loaded_index())
    }

    fn search_name(&self, request: &ResolutionRequest) -> Option<SearchName> {
        SearchName::from_request(request, &self.config.module_extensions)
    }

    fn resolve_in(&self, request: &ResolutionRequest, context: &ResolutionContext) -> Option<ModuleHandle> {
        let kind = context.kind();

        if request.is_resource_request() {
            tracing::debug!("Not resolving resource request {}", request);
            return None;
        }

        let Some(search) = self.search_name(request) else {
            tracing::debug!("Malformed request '{}'", request.requested_name);
            return None;
        };

        if eq_ignore_case(search.as_str(), &self.config.host_module_name) {
            return Some(self.host_module(kind));
        }

        if let Some(cached) = context.cached_result(&request.requested_name) {
            tracing::trace!("Cache hit for '{}' ({})", request.requested_name, kind);
            return cached;
        }

        tracing::debug!("Resolving {} as '{}' ({})", request, search, kind);

        let index = context.loaded_index();
        if let Some(loaded) = index.already_loaded(&search) {
            tracing::debug!("'{}' is already loaded as {}", search, loaded);
            return context.record_result(&request.requested_name, Some(loaded));
        }

        let ranked = self.rank_candidates(&search, &index);
        let mut outcome = None;
        for candidate in &ranked {
            match context.try_load(&candidate.path, &search, self.inspector.as_ref()) {
                LoadAttempt::Loaded(module) => {
                    outcome = Some(module);
                    break;
                }
                LoadAttempt::KnownFailure | LoadAttempt::Rejected | LoadAttempt::Failed(_) => {}
            }
        }

        match &outcome {
            Some(module) => tracing::debug!("Resolved '{}' to {}", request.requested_name, module),
            None => tracing::debug!(
                "No match for '{}' among {} candidates",
                request.requested_name,
                ranked.len()
            ),
        }

        context.record_result(&request.requested_name, outcome)
    }

    fn rank_candidates(&self, search: &SearchName, index: &LoadedModuleIndex) -> Vec<CandidateSnapshot> {
        let enumerator = CandidateEnumerator::new(
            self.roots.as_ref(),
            &self.locations,
            &self.config.module_extensions,
        );
        let candidates = index.remove_already_loaded(enumerator.enumerate(search));

        let prefix = search.required_prefix(self.config.prefix_match_len);
        let candidates: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| contains_ignore_case(&name.to_string_lossy(), prefix))
            })
            .filter(|path| self.inspector.is_loadable_module(path))
            .collect();

        let trusted_root = self.roots.primary_install_dir();
        self.ranker
            .rank(candidates, search, self.inspector.as_ref(), trusted_root.as_deref())
    }
}

/// Assembles a `Resolver`, defaulting every collaborator not supplied
pub struct ResolverBuilder {
    config: ResolverConfig,
    roots: Option<Box<dyn SearchRootProvider>>,
    inspector: Option<Box<dyn ModuleInspector>>,
    normal_loader: Option<Box<dyn ModuleLoader>>,
    metadata_loader: Option<Box<dyn ModuleLoader>>,
}

impl ResolverBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            roots: None,
            inspector: None,
            normal_loader: None,
            metadata_loader: None,
        }
    }

    pub fn search_roots(mut self, roots: impl SearchRootProvider + 'static) -> Self {
        self.roots = Some(Box::new(roots));
        self
    }

    pub fn inspector(mut self, inspector: impl ModuleInspector + 'static) -> Self {
        self.inspector = Some(Box::new(inspector));
        self
    }

    pub fn normal_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.normal_loader = Some(Box::new(loader));
        self
    }

    pub fn metadata_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.metadata_loader = Some(Box::new(loader));
        self
    }

    pub fn build(self) -> Result<Resolver> {
        self.config.validate()?;
        let ranker = FuzzyRanker::new(self.config.ranking_policy()?);

        let normal_loader = self
            .normal_loader
            .unwrap_or_else(|| Box::new(ContainerLoader::normal()));
        let metadata_loader = self
            .metadata_loader
            .unwrap_or_else(|| Box::new(ContainerLoader::metadata_only()));
        expect_kind(normal_loader.as_ref(), ContextKind::Normal)?;
        expect_kind(metadata_loader.as_ref(), ContextKind::MetadataOnly)?;

        let roots = self
            .roots
            .unwrap_or_else(|| Box::new(ConfiguredSearchRoots::from_config(&self.config)));
        let inspector = self
            .inspector
            .unwrap_or_else(|| Box::new(ContainerInspector::new()));

        let locations = SearchLocations::new();
        for folder in &self.config.search_folders {
            locations.add_folder(folder);
        }
        for file in &self.config.search_files {
            locations.add_file(file);
        }

        let diagnostics = self
            .config
            .diagnostics_log
            .as_deref()
            .and_then(DiagnosticLog::open_if_present);

        let host = |kind| {
            Arc::new(LoadedModule::dynamic(
                self.config.host_module_name.clone(),
                self.config.host_module_version,
                kind,
            ))
        };
        let host_normal = host(ContextKind::Normal);
        let host_metadata_only = host(ContextKind::MetadataOnly);

        Ok(Resolver {
            roots,
            inspector,
            locations,
            ranker,
            normal: ResolutionContext::new(normal_loader),
            metadata_only: ResolutionContext::new(metadata_loader),
            host_normal,
            host_metadata_only,
            diagnostics,
            config: self.config,
        })
    }
}

fn expect_kind(loader: &dyn ModuleLoader, expected: ContextKind) -> Result<()> {
    if loader.kind() != expected {
        return Err(Error::ConfigError(format!(
            "{} loader supplied for the {} context",
            loader.kind(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::container::write_container;
    use crate::types::{ModuleHeader, ModuleVersion};
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, name: &str, version: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(file);
        write_container(&path, &ModuleHeader::new(name, version.parse().unwrap()), b"code").unwrap();
        path
    }

    fn resolver_for(root: &Path, scratch: &Path) -> Resolver {
        let config = ResolverConfig {
            host_module_name: "MyHost".to_string(),
            host_module_version: ModuleVersion::new(8, 0, 0, 0),
            ..Default::default()
        };
        Resolver::builder(config)
            .search_roots(ConfiguredSearchRoots::new(vec![root.to_path_buf()]).with_working_dir(scratch))
            .build()
            .unwrap()
    }

    #[test]
    fn test_host_module_short_circuit() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = resolver_for(&temp_dir.path().join("root"), temp_dir.path());

        let module = resolver
            .resolve(&ResolutionRequest::new("myhost, Version=8.0.0.0"), ContextKind::Normal)
            .unwrap();
        assert!(Arc::ptr_eq(&module, &resolver.host_module(ContextKind::Normal)));
        assert!(module.is_dynamic());

        assert!(
            resolver
                .resolve(&ResolutionRequest::new("MyHost.resources"), ContextKind::Normal)
                .is_none()
        );
    }

    #[test]
    fn test_prefix_filter_drops_unrelated_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        write(&root, "PanelingTools.dll", "PanelingTools", "1.0");
        write(&root, "Unrelated.dll", "Unrelated", "1.0");
        write(&root, "PanelKit.dll", "PanelKit", "1.0");
        let resolver = resolver_for(&root, temp_dir.path());

        let ranked = resolver.candidates(
            &ResolutionRequest::new("PanelingTools, Version=1.0.0.0"),
            ContextKind::Normal,
        );
        let names: Vec<_> = ranked.iter().map(|c| c.stem.as_str()).collect();
        assert_eq!(names, vec!["PanelingTools", "PanelKit"]);
    }

    #[test]
    fn test_native_files_are_not_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("Foo.dll"), b"MZ native").unwrap();
        let resolver = resolver_for(&root, temp_dir.path());

        let request = ResolutionRequest::new("Foo, Version=1.0.0.0");
        assert!(resolver.candidates(&request, ContextKind::Normal).is_empty());
        assert!(resolver.resolve(&request, ContextKind::Normal).is_none());
        assert_eq!(resolver.context(ContextKind::Normal).failed_count(), 0);
    }

    #[test]
    fn test_loaded_copy_hides_other_roots() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        write(&root, "Foo.dll", "Foo", "1.0");
        let resolver = resolver_for(&root, temp_dir.path());

        let first = resolver
            .resolve(&ResolutionRequest::new("Foo, Version=1.0.0.0"), ContextKind::Normal)
            .unwrap();

        let other = temp_dir.path().join("other");
        write(&other, "Foo.dll", "Foo", "2.0");
        assert!(resolver.register_search_folder(&other));

        let ranked = resolver.candidates(&ResolutionRequest::new("Foo, Version=2.0.0.0"), ContextKind::Normal);
        assert!(ranked.is_empty());

        let second = resolver
            .resolve(&ResolutionRequest::new("Foo, Version=2.0.0.0"), ContextKind::Normal)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_primary_install_wins_equal_versions() {
        let temp_dir = TempDir::new().unwrap();
        let plugins = temp_dir.path().join("plugins");
        let install = temp_dir.path().join("install");
        write(&plugins, "Foo.dll", "Foo", "1.0");
        let trusted = write(&install, "Foo.dll", "Foo", "1.0");

        let roots = ConfiguredSearchRoots::new(vec![plugins, install.clone()])
            .with_primary_install_dir(&install)
            .with_working_dir(temp_dir.path());
        let resolver = Resolver::builder(ResolverConfig::default())
            .search_roots(roots)
            .build()
            .unwrap();

        let module = resolver
            .resolve(&ResolutionRequest::new("Foo, Version=1.0.0.0"), ContextKind::Normal)
            .unwrap();
        assert_eq!(module.location.as_deref(), Some(trusted.as_path()));
    }

    #[test]
    fn test_mismatched_loader_kind_is_rejected() {
        let result = Resolver::builder(ResolverConfig::default())
            .normal_loader(ContainerLoader::metadata_only())
            .build();
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_locations_are_registered() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("extra");
        write(&folder, "Extra.dll", "Extra", "1.0");

        let config = ResolverConfig {
            search_folders: vec![folder.clone(), temp_dir.path().join("missing")],
            ..Default::default()
        };
        let resolver = Resolver::builder(config)
            .search_roots(ConfiguredSearchRoots::default().with_working_dir(temp_dir.path()))
            .build()
            .unwrap();

        assert_eq!(resolver.search_locations().folders(), vec![folder]);
        assert!(
            resolver
                .resolve(&ResolutionRequest::new("Extra, Version=1.0.0.0"), ContextKind::Normal)
                .is_some()
        );
    }
}
