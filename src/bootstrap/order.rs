//! Initialization order resolution
//!
//! Depth-first over the dependency edges, visiting roots in registration order
//! and dependencies in declared order. A service is emitted only after every
//! service it depends on, so walking the result front to back is the same as
//! recursively initializing unmet dependencies first.

use super::types::ServiceDescriptor;
use crate::utils::error::BootstrapError;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Resolve the initialization order of the given services
pub(super) fn resolve_order(services: &[ServiceDescriptor]) -> Result<Vec<String>, BootstrapError> {
    let index: HashMap<&str, &ServiceDescriptor> =
        services.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(services.len());
    let mut order = Vec::with_capacity(services.len());
    let mut path: Vec<&str> = Vec::new();

    for service in services {
        visit(service, &index, &mut marks, &mut path, &mut order)?;
    }

    Ok(order)
}

fn visit<'a>(
    service: &'a ServiceDescriptor,
    index: &HashMap<&'a str, &'a ServiceDescriptor>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    order: &mut Vec<String>,
) -> Result<(), BootstrapError> {
    let name = service.name.as_str();
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|n| *n == name).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(BootstrapError::DependencyCycle { path: cycle });
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    path.push(name);

    for dependency in &service.dependencies {
        let dep = index.get(dependency.as_str()).ok_or_else(|| {
            BootstrapError::UnknownDependency {
                service: name.to_string(),
                dependency: dependency.clone(),
            }
        })?;
        visit(*dep, index, marks, path, order)?;
    }

    path.pop();
    marks.insert(name, Mark::Done);
    order.push(name.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::service::ManagedService;
    use crate::bootstrap::types::Criticality;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Noop;

    #[async_trait]
    impl ManagedService for Noop {
        async fn initialize(&self) -> Result<()> {
            Ok(())
        }
    }

    fn descriptor(name: &str, deps: &[&str]) -> ServiceDescriptor {
        let service = Arc::new(Noop);
        ServiceDescriptor {
            name: name.to_string(),
            service: service.clone(),
            instance: service,
            type_name: "Noop",
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            criticality: Criticality::Critical,
        }
    }

    #[test]
    fn test_registration_order_without_edges() {
        let services = vec![descriptor("a", &[]), descriptor("b", &[]), descriptor("c", &[])];
        assert_eq!(resolve_order(&services).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dependencies_come_first() {
        let services = vec![
            descriptor("performance", &["cache", "realtime"]),
            descriptor("realtime", &[]),
            descriptor("cache", &[]),
        ];
        assert_eq!(
            resolve_order(&services).unwrap(),
            vec!["cache", "realtime", "performance"]
        );
    }

    #[test]
    fn test_diamond_visits_shared_dependency_once() {
        let services = vec![
            descriptor("top", &["left", "right"]),
            descriptor("left", &["base"]),
            descriptor("right", &["base"]),
            descriptor("base", &[]),
        ];
        assert_eq!(
            resolve_order(&services).unwrap(),
            vec!["base", "left", "right", "top"]
        );
    }

    #[test]
    fn test_cycle_reports_path() {
        let services = vec![
            descriptor("a", &["b"]),
            descriptor("b", &["c"]),
            descriptor("c", &["a"]),
        ];
        let err = resolve_order(&services).unwrap_err();
        assert_eq!(
            err,
            BootstrapError::DependencyCycle {
                path: vec!["a".into(), "b".into(), "c".into(), "a".into()]
            }
        );
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let services = vec![descriptor("a", &["a"])];
        assert!(matches!(
            resolve_order(&services),
            Err(BootstrapError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_unknown_dependency() {
        let services = vec![descriptor("jobs", &["database"])];
        assert_eq!(
            resolve_order(&services).unwrap_err(),
            BootstrapError::UnknownDependency {
                service: "jobs".to_string(),
                dependency: "database".to_string(),
            }
        );
    }
}
