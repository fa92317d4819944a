//! End-to-end resolution behaviour against real module containers on disk

use modresolve_core::{
    ContextKind, Error, ModuleHandle, ModuleHeader, ModuleLoader, ModuleVersion, ResolutionRequest,
    Resolver, ResolverConfig, SearchRootProvider,
    services::{ConfiguredSearchRoots, ContainerLoader, container::write_container},
    types::LoadedModule,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Search roots that count how often the filesystem is enumerated
struct CountingRoots {
    inner: ConfiguredSearchRoots,
    calls: Arc<AtomicUsize>,
}

impl SearchRootProvider for CountingRoots {
    fn plugin_install_roots(&self) -> Vec<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.plugin_install_roots()
    }

    fn primary_install_dir(&self) -> Option<PathBuf> {
        self.inner.primary_install_dir()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.inner.current_dir()
    }
}

/// Loader that fails for chosen paths and counts every attempt
struct FlakyLoader {
    inner: ContainerLoader,
    failing: HashSet<PathBuf>,
    attempts: Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl FlakyLoader {
    fn new(kind: ContextKind, failing: &[PathBuf]) -> (Self, Arc<Mutex<HashMap<PathBuf, usize>>>) {
        let attempts = Arc::new(Mutex::new(HashMap::new()));
        let loader = Self {
            inner: ContainerLoader::new(kind),
            failing: failing.iter().cloned().collect(),
            attempts: Arc::clone(&attempts),
        };
        (loader, attempts)
    }
}

impl ModuleLoader for FlakyLoader {
    fn kind(&self) -> ContextKind {
        self.inner.kind()
    }

    fn load(&self, path: &Path) -> modresolve_core::Result<ModuleHandle> {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;
        if self.failing.contains(path) {
            return Err(Error::LoadError {
                path: path.to_path_buf(),
                reason: "bad image format".to_string(),
            });
        }
        self.inner.load(path)
    }

    fn loaded_modules(&self) -> Vec<ModuleHandle> {
        self.inner.loaded_modules()
    }
}

struct Fixture {
    temp_dir: TempDir,
    calls: Arc<AtomicUsize>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn dir(&self, name: &str) -> PathBuf {
        let dir = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn module(&self, dir: &str, file: &str, name: &str, version: &str) -> PathBuf {
        self.module_for_arch(dir, file, name, version, None)
    }

    fn module_for_arch(&self, dir: &str, file: &str, name: &str, version: &str, arch: Option<&str>) -> PathBuf {
        let path = self.dir(dir).join(file);
        let mut header = ModuleHeader::new(name, version.parse().unwrap());
        header.arch = arch.map(str::to_string);
        write_container(&path, &header, format!("{name} {version}").as_bytes()).unwrap();
        path
    }

    fn roots(&self, roots: &[&str]) -> CountingRoots {
        let plugin_roots = roots.iter().map(|r| self.dir(r)).collect();
        CountingRoots {
            inner: ConfiguredSearchRoots::new(plugin_roots).with_working_dir(self.dir("cwd")),
            calls: Arc::clone(&self.calls),
        }
    }

    fn resolver(&self, roots: &[&str]) -> Resolver {
        Resolver::builder(ResolverConfig::default())
            .search_roots(self.roots(roots))
            .build()
            .unwrap()
    }

    fn enumerations(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn request(name: &str) -> ResolutionRequest {
    ResolutionRequest::new(name)
}

#[test]
fn test_identical_request_is_served_from_cache() {
    let fixture = Fixture::new();
    fixture.module("plugins", "Foo.dll", "Foo", "1.0");
    let resolver = fixture.resolver(&["plugins"]);

    let first = resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(fixture.enumerations(), 1);

    let second = resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fixture.enumerations(), 1);

    assert!(resolver.resolve(&request("Missing, Version=1.0.0.0"), ContextKind::Normal).is_none());
    assert!(resolver.resolve(&request("Missing, Version=1.0.0.0"), ContextKind::Normal).is_none());
    assert_eq!(fixture.enumerations(), 2);
}

#[test]
fn test_contexts_do_not_share_failures() {
    let fixture = Fixture::new();
    fixture.module_for_arch("plugins", "Foo.dll", "Foo", "1.0", Some("no-such-arch"));
    let resolver = fixture.resolver(&["plugins"]);
    let foo = request("Foo, Version=1.0.0.0");

    assert!(resolver.resolve(&foo, ContextKind::Normal).is_none());
    assert_eq!(resolver.context(ContextKind::Normal).failed_count(), 1);

    let inspected = resolver.resolve(&foo, ContextKind::MetadataOnly).unwrap();
    assert_eq!(inspected.context, ContextKind::MetadataOnly);
    assert_eq!(resolver.context(ContextKind::MetadataOnly).failed_count(), 0);
}

#[test]
fn test_metadata_failure_does_not_block_normal_load() {
    let fixture = Fixture::new();
    let path = fixture.module("plugins", "Foo.dll", "Foo", "1.0");
    let (metadata_loader, _) = FlakyLoader::new(ContextKind::MetadataOnly, &[path.clone()]);
    let resolver = Resolver::builder(ResolverConfig::default())
        .search_roots(fixture.roots(&["plugins"]))
        .metadata_loader(metadata_loader)
        .build()
        .unwrap();

    assert!(resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::MetadataOnly).is_none());
    assert!(resolver.context(ContextKind::MetadataOnly).has_failed(&path));

    let module = resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(module.location.as_deref(), Some(path.as_path()));
}

#[test]
fn test_exact_name_beats_longer_name() {
    let fixture = Fixture::new();
    fixture.module("plugins", "FooBar.dll", "FooBar", "3.0");
    let foo = fixture.module("plugins", "Foo.dll", "Foo", "1.0");
    let resolver = fixture.resolver(&["plugins"]);

    let module = resolver.resolve(&request("Foo"), ContextKind::Normal).unwrap();
    assert_eq!(module.name, "Foo");
    assert_eq!(module.location.as_deref(), Some(foo.as_path()));
}

#[test]
fn test_higher_version_wins_across_roots() {
    let fixture = Fixture::new();
    fixture.module("old-root", "Foo.dll", "Foo", "1.0");
    let newer = fixture.module("new-root", "Foo.dll", "Foo", "2.0");
    let resolver = fixture.resolver(&["old-root", "new-root"]);

    let module = resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(module.version, ModuleVersion::new(2, 0, 0, 0));
    assert_eq!(module.location.as_deref(), Some(newer.as_path()));
}

#[test]
fn test_already_loaded_module_skips_filesystem() {
    let fixture = Fixture::new();
    fixture.module("plugins", "Foo.dll", "Foo", "2.0");

    let loader = ContainerLoader::normal();
    let resident = loader.register_module(LoadedModule {
        name: "Foo".to_string(),
        version: ModuleVersion::new(1, 0, 0, 0),
        location: Some(PathBuf::from("/host/bin/Foo.dll")),
        context: ContextKind::Normal,
    });
    let resolver = Resolver::builder(ResolverConfig::default())
        .search_roots(fixture.roots(&["plugins"]))
        .normal_loader(loader)
        .build()
        .unwrap();

    let module = resolver.resolve(&request("Foo, Version=2.0.0.0"), ContextKind::Normal).unwrap();
    assert!(Arc::ptr_eq(&module, &resident));
    assert_eq!(fixture.enumerations(), 0);
}

#[test]
fn test_failed_file_is_never_attempted_again() {
    let fixture = Fixture::new();
    let first = fixture.module("a", "Foo.dll", "Foo", "2.0");
    let second = fixture.module("b", "Foo.dll", "Foo", "1.0");
    let (loader, attempts) = FlakyLoader::new(ContextKind::Normal, &[first.clone(), second.clone()]);
    let resolver = Resolver::builder(ResolverConfig::default())
        .search_roots(fixture.roots(&["a", "b"]))
        .normal_loader(loader)
        .build()
        .unwrap();

    assert!(resolver.resolve(&request("Foo, Version=2.0.0.0"), ContextKind::Normal).is_none());
    assert!(resolver.resolve(&request("Foo, Version=1.0.0.0"), ContextKind::Normal).is_none());

    let attempts = attempts.lock().unwrap();
    assert_eq!(attempts.get(&first), Some(&1));
    assert_eq!(attempts.get(&second), Some(&1));
    assert_eq!(fixture.enumerations(), 2);
}

#[test]
fn test_failed_best_candidate_falls_through_to_next() {
    let fixture = Fixture::new();
    let best = fixture.module("a", "Foo.dll", "Foo", "2.0");
    let fallback = fixture.module("b", "Foo.dll", "Foo", "1.0");
    let (loader, attempts) = FlakyLoader::new(ContextKind::Normal, &[best.clone()]);
    let resolver = Resolver::builder(ResolverConfig::default())
        .search_roots(fixture.roots(&["a", "b"]))
        .normal_loader(loader)
        .build()
        .unwrap();

    let module = resolver.resolve(&request("Foo, Version=2.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(module.location.as_deref(), Some(fallback.as_path()));
    assert_eq!(attempts.lock().unwrap().get(&best), Some(&1));
}

#[test]
fn test_resource_requests_are_rejected_without_enumeration() {
    let fixture = Fixture::new();
    fixture.module("plugins", "Foo.resources.dll", "Foo.resources", "1.0");
    let resolver = fixture.resolver(&["plugins"]);

    let satellite = request("Foo.resources, Version=1.0.0.0, Culture=de-DE");
    assert!(resolver.resolve(&satellite, ContextKind::Normal).is_none());
    assert!(resolver.resolve(&satellite, ContextKind::MetadataOnly).is_none());
    assert!(resolver.resolve(&request("Foo.resources.dll"), ContextKind::Normal).is_none());
    assert_eq!(fixture.enumerations(), 0);
}

#[test]
fn test_cached_miss_survives_later_registration() {
    let fixture = Fixture::new();
    let resolver = fixture.resolver(&[]);

    assert!(resolver.resolve(&request("Bar"), ContextKind::Normal).is_none());

    fixture.module("late", "Bar.dll", "Bar", "1.0");
    assert!(resolver.register_search_folder(fixture.dir("late")));

    // Same string: the cached miss stands
    assert!(resolver.resolve(&request("Bar"), ContextKind::Normal).is_none());
    assert_eq!(fixture.enumerations(), 1);

    // Differently qualified string: full search finds the new module
    let module = resolver.resolve(&request("Bar, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(module.name, "Bar");
}

#[test]
fn test_script_request_searches_working_directory() {
    let fixture = Fixture::new();
    fixture.module("cwd", "MyFunctions.dll", "MyFunctions", "1.0");
    let resolver = fixture.resolver(&["plugins"]);

    assert!(resolver.resolve(&request("MyFunctions, Version=1.0.0.0"), ContextKind::Normal).is_none());

    let module = resolver.resolve(&request("MyFunctions.dll"), ContextKind::Normal).unwrap();
    assert_eq!(module.name, "MyFunctions");
}

#[test]
fn test_registered_file_is_a_candidate() {
    let fixture = Fixture::new();
    let file = fixture.module("loose", "Widget.rhp", "Widget", "1.0");
    let resolver = fixture.resolver(&["plugins"]);

    assert!(resolver.register_search_file(&file));
    assert!(!resolver.register_search_file(&file));

    let module = resolver.resolve(&request("Widget, Version=1.0.0.0"), ContextKind::Normal).unwrap();
    assert_eq!(module.location.as_deref(), Some(file.as_path()));
}

#[test]
fn test_concurrent_resolutions_agree() {
    let fixture = Fixture::new();
    fixture.module("a", "Foo.dll", "Foo", "1.0");
    fixture.module("b", "Foo.dll", "Foo", "1.0");
    let resolver = Arc::new(fixture.resolver(&["a", "b"]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                let kind = if i % 2 == 0 {
                    ContextKind::Normal
                } else {
                    ContextKind::MetadataOnly
                };
                (kind, resolver.resolve(&request("Foo, Version=1.0.0.0"), kind))
            })
        })
        .collect();

    let results: Vec<(ContextKind, ModuleHandle)> = handles
        .into_iter()
        .map(|h| {
            let (kind, module) = h.join().unwrap();
            (kind, module.unwrap())
        })
        .collect();

    for kind in [ContextKind::Normal, ContextKind::MetadataOnly] {
        let cached = resolver
            .context(kind)
            .cached_result("Foo, Version=1.0.0.0")
            .flatten()
            .unwrap();
        for (_, module) in results.iter().filter(|(k, _)| *k == kind) {
            assert!(Arc::ptr_eq(module, &cached));
            assert_eq!(module.context, kind);
        }
    }
}

#[test]
fn test_diagnostics_log_records_requests() {
    let fixture = Fixture::new();
    fixture.module("plugins", "Foo.dll", "Foo", "1.0");
    let log = fixture.temp_dir.path().join("resolver.log");
    std::fs::write(&log, "").unwrap();

    let config = ResolverConfig {
        diagnostics_log: Some(log.clone()),
        ..Default::default()
    };
    let resolver = Resolver::builder(config)
        .search_roots(fixture.roots(&["plugins"]))
        .build()
        .unwrap();

    resolver.resolve(
        &request("Foo, Version=1.0.0.0").with_requesting_module("Consumer"),
        ContextKind::Normal,
    );
    resolver.resolve(&request("Nope, Version=1.0.0.0"), ContextKind::Normal);

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\tConsumer\tFoo, Version=1.0.0.0 @ "));
    assert!(lines[1].ends_with("\tunresolved"));
}
