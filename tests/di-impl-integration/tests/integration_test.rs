//! Centralized integration tests: pack -> assemble -> register -> resolve
use anyhow::Result;
use di_abstractions::{Aggregate, ComponentRegistry, ConstructionKind, Cradle, Unit};
use di_impl::DiContainerImpl;
use infrastructure_common::{DependencyError, Lifetime};
use infrastructure_composition::{
    ContainerBuilder, MockOverrides, PackerOptions, RegistrationAssembler, TreePacker, UnitCatalog,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct Repository {
    table: String,
}

#[derive(Debug)]
struct OrderService {
    repository: Arc<Repository>,
}

fn touch(root: &Path, relative: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, "")?;
    Ok(())
}

fn shop_tree(root: &Path) -> Result<UnitCatalog> {
    for file in [
        "repositories/order.rs",
        "repositories/order.test.rs",
        "services/order.transient.rs",
        "services/reports/daily.rs",
        "services/reports/weekly.rs",
        "gateways/index.rs",
        "gateways/payment.rs",
    ] {
        touch(root, file)?;
    }

    Ok(UnitCatalog::new(root)
        .with(
            "repositories/order.rs",
            Unit::class(|_: &dyn Cradle| {
                Ok(Repository {
                    table: "orders".to_string(),
                })
            }),
        )
        .with(
            "services/order.transient.rs",
            Unit::class(|cradle: &dyn Cradle| {
                Ok(OrderService {
                    repository: cradle.resolve_as::<Repository>("orderRepository")?,
                })
            }),
        )
        .with("services/reports/daily.rs", Unit::value("daily".to_string()))
        .with(
            "services/reports/weekly.rs",
            Unit::factory(|_: &dyn Cradle| -> Result<String, DependencyError> {
                Err(DependencyError::creation_failed("weekly", "not scheduled"))
            }),
        )
        .with("gateways/index.rs", Unit::value(vec!["payment".to_string()]))
        .with("gateways/payment.rs", Unit::value("unused".to_string())))
}

fn pack_into(container: &DiContainerImpl, packer: &TreePacker) -> Result<usize> {
    let assembler = RegistrationAssembler::new(Lifetime::Singleton);
    let registrations = assembler.assemble(packer.pack_root()?);
    Ok(assembler.register(container, registrations)?)
}

#[test]
fn test_tree_is_registered_and_resolvable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = shop_tree(dir.path())?;
    let options = PackerOptions {
        src_dir: dir.path().to_path_buf(),
        ..PackerOptions::default()
    };
    let packer = TreePacker::new(&options, Arc::new(catalog))?;

    let container = DiContainerImpl::new();
    assert_eq!(pack_into(&container, &packer)?, 4);
    assert_eq!(
        container.registered_names(),
        vec!["gateways", "orderRepository", "orderService", "reportsService"]
    );

    let service = container.resolve_as::<OrderService>("orderService")?;
    assert_eq!(service.repository.table, "orders");
    let repository = container.resolve_as::<Repository>("orderRepository")?;
    assert!(Arc::ptr_eq(&service.repository, &repository));

    let reports = container.resolve_as::<Aggregate>("reportsService")?;
    assert_eq!(reports.names().collect::<Vec<_>>(), vec!["daily"]);

    let gateways = container.resolve_as::<Vec<String>>("gateways")?;
    assert_eq!(gateways.as_slice(), ["payment".to_string()]);
    assert_eq!(
        container.registration("gateways").map(|r| r.kind),
        Some(ConstructionKind::Value)
    );
    Ok(())
}

#[test]
fn test_repacking_replaces_registrations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = shop_tree(dir.path())?;
    let options = PackerOptions {
        src_dir: dir.path().to_path_buf(),
        ..PackerOptions::default()
    };
    let packer = TreePacker::new(&options, Arc::new(catalog))?;

    let container = DiContainerImpl::new();
    pack_into(&container, &packer)?;
    let first = container.registered_names();
    pack_into(&container, &packer)?;

    assert_eq!(first, container.registered_names());
    Ok(())
}

#[test]
fn test_caller_mock_replaces_repository() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = shop_tree(dir.path())?;
    let options = PackerOptions {
        src_dir: dir.path().to_path_buf(),
        ..PackerOptions::default()
    };
    let mocks = MockOverrides::new().replace(
        "mockOrderRepository",
        Unit::class(|_: &dyn Cradle| {
            Ok(Repository {
                table: "in_memory".to_string(),
            })
        }),
    );
    let packer = TreePacker::new(&options, Arc::new(catalog))?.with_mocks(mocks);

    let container = DiContainerImpl::new();
    pack_into(&container, &packer)?;

    let service = container.resolve_as::<OrderService>("orderService")?;
    assert_eq!(service.repository.table, "in_memory");
    Ok(())
}

#[tokio::test]
async fn test_builder_produces_working_container() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let catalog = shop_tree(dir.path())?;

    let container = ContainerBuilder::new()
        .src_dir(dir.path())
        .with_loader(catalog)
        .build()
        .await?;

    let scope = container.create_scope("request");
    let service = scope.resolve_as::<OrderService>("orderService")?;
    assert_eq!(service.repository.table, "orders");
    Ok(())
}
