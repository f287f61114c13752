//! End-to-end generation through the real adapters.

use std::fs;
use std::path::Path;

use projgen_adapters::{
    LocalFilesystem, MemoryFilesystem, NoopGateway, SqliteGateway, builtin_templates,
};
use projgen_core::{application::ApplicationError, prelude::*};
use tempfile::TempDir;

fn local_service(gateway: Box<dyn ProvisioningGateway>) -> GenerationService {
    GenerationService::new(ProjectMaterializer::new(Box::new(LocalFilesystem::new())), gateway)
}

#[test]
fn builtin_templates_produce_a_runnable_stub() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("tpl");
    let projects = tmp.path().join("apps");
    fs::create_dir(&projects).unwrap();
    builtin_templates::export(&templates, false).unwrap();

    let service = local_service(Box::new(SqliteGateway::new(tmp.path().join("dbs"))));
    let ids = service.derive("My Shop").unwrap();
    let outcome = service
        .generate(&GenerationRequest::new(ids, &templates, &projects))
        .unwrap();

    let root = projects.join("my_shop");
    let index = fs::read_to_string(root.join("index.php")).unwrap();
    assert!(index.contains("$myShop = new App\\MyShop();"));
    assert!(index.contains("$myShop->run();"));

    let controller = fs::read_to_string(root.join("lib/App/MyShop.php")).unwrap();
    assert!(controller.contains("class MyShop extends BaseController"));

    let db = fs::read_to_string(root.join("config/db.php")).unwrap();
    assert!(db.contains("'DB_NAME' => 'my_shop'"));

    for path in outcome.skeleton.copied_files() {
        let text = fs::read_to_string(root.join(path));
        // The controller was renamed after copying.
        if let Ok(text) = text {
            assert!(!text.contains("%CONTROLLERNAME%"), "{}", path.display());
        }
    }

    assert!(tmp.path().join("dbs/my_shop.sqlite").is_file());
    assert_eq!(outcome.backend, "sqlite");
}

#[test]
fn rerun_fails_and_keeps_the_first_project() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("tpl");
    builtin_templates::export(&templates, false).unwrap();

    let service = local_service(Box::new(NoopGateway));
    let ids = service.derive("blog").unwrap();
    let request = GenerationRequest::new(ids, &templates, tmp.path());

    service.generate(&request).unwrap();
    fs::write(tmp.path().join("blog/index.php"), "edited").unwrap();

    let err = service.generate(&request).unwrap_err();

    assert!(matches!(
        err,
        ProjgenError::Application(ApplicationError::DirectoryCreation { .. })
    ));
    assert_eq!(fs::read_to_string(tmp.path().join("blog/index.php")).unwrap(), "edited");
}

#[test]
fn memory_filesystem_runs_the_same_workflow() {
    let fs = MemoryFilesystem::new();
    for template in builtin_templates::BUILTIN_TEMPLATES {
        fs.seed_file(
            Path::new("/tpl").join(template.entry.relative_path()),
            template.content,
        );
    }
    fs.seed_dir("/apps");

    let materializer = ProjectMaterializer::new(Box::new(fs.clone()));
    let ids = DerivedIdentifiers::from_name("Photo Album").unwrap();
    let skeleton = materializer
        .materialize(Path::new("/tpl"), Path::new("/apps/photo_album"), &ids)
        .unwrap();

    assert_eq!(skeleton.controller(), Some(Path::new("lib/App/PhotoAlbum.php")));
    assert!(fs.exists(Path::new("/apps/photo_album/sql/upgrade")));
    assert!(fs.exists(Path::new("/apps/photo_album/templates")));
    assert_eq!(
        fs.read_file("/apps/photo_album/.gitignore").as_deref(),
        Some(builtin_templates::BUILTIN_TEMPLATES[6].content)
    );

    // Only the published project remains under /apps.
    let leftovers: Vec<_> = fs
        .list_directories()
        .into_iter()
        .filter(|d| d.parent() == Some(Path::new("/apps")))
        .collect();
    assert_eq!(leftovers, vec![Path::new("/apps/photo_album").to_path_buf()]);
}

#[test]
fn sqlite_collision_happens_after_the_tree_exists() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("tpl");
    let projects = tmp.path().join("apps");
    fs::create_dir(&projects).unwrap();
    builtin_templates::export(&templates, false).unwrap();
    let gateway = SqliteGateway::new(tmp.path().join("dbs"));
    gateway.create_database("blog").unwrap();

    let service = local_service(Box::new(gateway));
    let ids = service.derive("blog").unwrap();
    let err = service
        .generate(&GenerationRequest::new(ids, &templates, &projects))
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(projects.join("blog/lib/App/Blog.php").is_file());
}
