//! Resolves a raw manifest application into the fully-defaulted form the
//! applier works from.

use crate::payloads::{ManifestApplication, ManifestApplicationProcess, ManifestRoute};
use crate::routes::random_host_suffix;
use crate::state_collector::AppState;
use cfkube_storage::PROCESS_TYPE_WEB;
use rand::Rng;

/// Buildpack names that mean "let the platform pick".
const AUTO_DETECT_BUILDPACKS: [&str; 2] = ["default", "null"];

#[derive(Debug, Clone)]
pub struct Normalizer {
    default_domain_name: String,
}

impl Normalizer {
    pub fn new(default_domain_name: impl Into<String>) -> Self {
        Self {
            default_domain_name: default_domain_name.into(),
        }
    }

    pub fn default_domain_name(&self) -> &str {
        &self.default_domain_name
    }

    pub fn normalize(
        &self,
        desired: &ManifestApplication,
        observed: &AppState,
    ) -> ManifestApplication {
        self.normalize_with_rng(desired, observed, &mut rand::thread_rng())
    }

    /// Same as [`normalize`](Self::normalize) with a caller-supplied source
    /// of randomness for `random-route`.
    pub fn normalize_with_rng<R: Rng + ?Sized>(
        &self,
        desired: &ManifestApplication,
        observed: &AppState,
        rng: &mut R,
    ) -> ManifestApplication {
        ManifestApplication {
            name: desired.name.clone(),
            env: desired.env.clone(),
            buildpacks: normalize_buildpacks(desired),
            processes: normalize_processes(desired),
            routes: self.normalize_routes(desired, observed, rng),
            no_route: desired.no_route,
            services: desired.services.clone(),
            metadata: desired.metadata.clone(),
            ..Default::default()
        }
    }

    fn normalize_routes<R: Rng + ?Sized>(
        &self,
        desired: &ManifestApplication,
        observed: &AppState,
        rng: &mut R,
    ) -> Vec<ManifestRoute> {
        if desired.no_route {
            return Vec::new();
        }
        // Implicit routes are only ever added to an app that has none.
        if !desired.routes.is_empty() || !observed.routes.is_empty() {
            return desired.routes.clone();
        }

        let mut routes = Vec::new();
        if desired.default_route {
            routes.push(ManifestRoute::new(format!(
                "{}.{}",
                desired.name, self.default_domain_name
            )));
        }
        if desired.random_route {
            routes.push(ManifestRoute::new(format!(
                "{}-{}.{}",
                desired.name,
                random_host_suffix(rng),
                self.default_domain_name
            )));
        }
        routes
    }
}

fn normalize_buildpacks(desired: &ManifestApplication) -> Option<Vec<String>> {
    match desired.buildpack.as_deref() {
        Some(legacy) if !AUTO_DETECT_BUILDPACKS.contains(&legacy) => {
            let mut buildpacks = vec![legacy.to_string()];
            buildpacks.extend(desired.buildpacks.iter().flatten().cloned());
            Some(buildpacks)
        }
        _ => desired.buildpacks.clone(),
    }
}

fn fold_disk_quota(process: &mut ManifestApplicationProcess) {
    if process.disk_quota.is_none() {
        process.disk_quota = process.alt_disk_quota.take();
    } else {
        process.alt_disk_quota = None;
    }
}

fn has_web_overrides(desired: &ManifestApplication) -> bool {
    desired.memory.is_some()
        || desired.disk_quota.is_some()
        || desired.alt_disk_quota.is_some()
        || desired.instances.is_some()
        || desired.command.is_some()
        || desired.health_check_type.is_some()
        || desired.health_check_http_endpoint.is_some()
        || desired.health_check_invocation_timeout.is_some()
        || desired.timeout.is_some()
}

/// Folds app-level process fields into the web process. Fields the web
/// process sets itself are never overwritten.
fn normalize_processes(desired: &ManifestApplication) -> Vec<ManifestApplicationProcess> {
    let mut processes = desired.processes.clone();
    for process in &mut processes {
        fold_disk_quota(process);
    }

    if !has_web_overrides(desired) {
        return processes;
    }

    let web_index = match processes
        .iter()
        .position(|p| p.process_type == PROCESS_TYPE_WEB)
    {
        Some(index) => index,
        None => {
            processes.push(ManifestApplicationProcess::new(PROCESS_TYPE_WEB));
            processes.len() - 1
        }
    };
    let web = &mut processes[web_index];

    let app_disk_quota = desired
        .disk_quota
        .as_ref()
        .or(desired.alt_disk_quota.as_ref());

    fill(&mut web.memory, desired.memory.as_ref());
    fill(&mut web.disk_quota, app_disk_quota);
    fill(&mut web.instances, desired.instances.as_ref());
    fill(&mut web.command, desired.command.as_ref());
    fill(&mut web.health_check_type, desired.health_check_type.as_ref());
    fill(
        &mut web.health_check_http_endpoint,
        desired.health_check_http_endpoint.as_ref(),
    );
    fill(
        &mut web.health_check_invocation_timeout,
        desired.health_check_invocation_timeout.as_ref(),
    );
    fill(&mut web.timeout, desired.timeout.as_ref());

    processes
}

fn fill<T: Clone>(target: &mut Option<T>, app_level: Option<&T>) {
    if target.is_none() {
        *target = app_level.cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::route_record;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DOMAIN: &str = "apps.example.com";

    fn normalizer() -> Normalizer {
        Normalizer::new(DOMAIN)
    }

    fn app(name: &str) -> ManifestApplication {
        ManifestApplication {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn state_with_route() -> AppState {
        let mut state = AppState::default();
        state.routes.insert(
            "other.apps.example.com".into(),
            route_record("r-1", "other", DOMAIN, "", &["app-1"]),
        );
        state
    }

    #[test]
    fn test_app_disk_quota_alias_is_folded() {
        let desired = ManifestApplication {
            alt_disk_quota: Some("1G".into()),
            ..app("my-app")
        };

        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(normalized.processes.len(), 1);
        assert_eq!(normalized.processes[0].disk_quota.as_deref(), Some("1G"));
    }

    #[test]
    fn test_process_disk_quota_alias_is_folded() {
        let desired = ManifestApplication {
            processes: vec![ManifestApplicationProcess {
                alt_disk_quota: Some("256M".into()),
                ..ManifestApplicationProcess::new("worker")
            }],
            ..app("my-app")
        };

        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(normalized.processes[0].disk_quota.as_deref(), Some("256M"));
        assert!(normalized.processes[0].alt_disk_quota.is_none());
    }

    #[test]
    fn test_disk_quota_wins_over_alias() {
        let desired = ManifestApplication {
            disk_quota: Some("2G".into()),
            alt_disk_quota: Some("1G".into()),
            processes: vec![ManifestApplicationProcess {
                disk_quota: Some("512M".into()),
                alt_disk_quota: Some("256M".into()),
                ..ManifestApplicationProcess::new("worker")
            }],
            ..app("my-app")
        };

        let normalized = normalizer().normalize(&desired, &AppState::default());
        let worker = normalized
            .processes
            .iter()
            .find(|p| p.process_type == "worker")
            .unwrap();
        assert_eq!(worker.disk_quota.as_deref(), Some("512M"));
        assert!(worker.alt_disk_quota.is_none());

        let web = normalized
            .processes
            .iter()
            .find(|p| p.process_type == "web")
            .unwrap();
        assert_eq!(web.disk_quota.as_deref(), Some("2G"));
        assert!(web.alt_disk_quota.is_none());
    }

    #[test]
    fn test_web_process_synthesized_from_app_fields() {
        let desired = ManifestApplication {
            memory: Some("512M".into()),
            instances: Some(2),
            command: Some("run".into()),
            health_check_type: Some("http".into()),
            ..app("my-app")
        };

        let normalized = normalizer().normalize(&desired, &AppState::default());
        let web = &normalized.processes[0];
        assert_eq!(web.process_type, "web");
        assert_eq!(web.memory.as_deref(), Some("512M"));
        assert_eq!(web.instances, Some(2));
        assert_eq!(web.command.as_deref(), Some("run"));
        assert_eq!(web.health_check_type.as_deref(), Some("http"));
    }

    #[test]
    fn test_process_level_wins_over_app_level() {
        let desired = ManifestApplication {
            memory: Some("512M".into()),
            instances: Some(2),
            processes: vec![ManifestApplicationProcess {
                memory: Some("2G".into()),
                ..ManifestApplicationProcess::new("web")
            }],
            ..app("my-app")
        };

        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(normalized.processes.len(), 1);
        assert_eq!(normalized.processes[0].memory.as_deref(), Some("2G"));
        assert_eq!(normalized.processes[0].instances, Some(2));
    }

    #[test]
    fn test_no_web_process_without_app_fields() {
        let normalized = normalizer().normalize(&app("my-app"), &AppState::default());
        assert!(normalized.processes.is_empty());
    }

    #[test]
    fn test_legacy_buildpack_is_prepended() {
        let desired = ManifestApplication {
            buildpack: Some("ruby_buildpack".into()),
            buildpacks: Some(vec!["go_buildpack".into()]),
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(
            normalized.buildpacks,
            Some(vec!["ruby_buildpack".to_string(), "go_buildpack".to_string()])
        );
        assert!(normalized.buildpack.is_none());

        for auto in ["default", "null"] {
            let desired = ManifestApplication {
                buildpack: Some(auto.into()),
                ..app("my-app")
            };
            let normalized = normalizer().normalize(&desired, &AppState::default());
            assert_eq!(normalized.buildpacks, None);
        }
    }

    #[test]
    fn test_default_route_synthesized() {
        let desired = ManifestApplication {
            default_route: true,
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(
            normalized.routes,
            vec![ManifestRoute::new("my-app.apps.example.com")]
        );
    }

    #[test]
    fn test_random_route_synthesized() {
        let desired = ManifestApplication {
            random_route: true,
            ..app("my-app")
        };
        let mut rng = StdRng::seed_from_u64(42);
        let normalized = normalizer().normalize_with_rng(&desired, &AppState::default(), &mut rng);

        assert_eq!(normalized.routes.len(), 1);
        let route = &normalized.routes[0].route;
        assert!(route.starts_with("my-app-"));
        assert!(route.ends_with(".apps.example.com"));
    }

    #[test]
    fn test_default_and_random_routes_both_added() {
        let desired = ManifestApplication {
            default_route: true,
            random_route: true,
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(normalized.routes.len(), 2);
    }

    #[test]
    fn test_no_synthesis_when_routes_observed() {
        let desired = ManifestApplication {
            default_route: true,
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &state_with_route());
        assert!(normalized.routes.is_empty());
    }

    #[test]
    fn test_no_synthesis_when_routes_declared() {
        let desired = ManifestApplication {
            default_route: true,
            routes: vec![ManifestRoute::new("custom.apps.example.com")],
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert_eq!(
            normalized.routes,
            vec![ManifestRoute::new("custom.apps.example.com")]
        );
    }

    #[test]
    fn test_no_route_returns_no_routes() {
        let desired = ManifestApplication {
            no_route: true,
            routes: vec![ManifestRoute::new("custom.apps.example.com")],
            ..app("my-app")
        };
        let normalized = normalizer().normalize(&desired, &AppState::default());
        assert!(normalized.routes.is_empty());
        assert!(normalized.no_route);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let desired = ManifestApplication {
            memory: Some("512M".into()),
            default_route: true,
            ..app("my-app")
        };
        let observed = AppState::default();
        let before = desired.clone();

        let _ = normalizer().normalize(&desired, &observed);
        assert_eq!(desired, before);
        assert_eq!(observed, AppState::default());
    }
}
