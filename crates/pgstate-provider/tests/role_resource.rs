//! `postgresql_role` lifecycle through the provider surface

use pgstate_provider::{PlanAction, ProviderError};
use serde_json::json;

mod common;
use common::{cleanup, configured_provider, unique_role_name};

#[tokio::test]
async fn test_create_read_update_delete() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    let resource = provider.resource("postgresql_role").unwrap();
    let name = unique_role_name("crud");

    let plan = resource
        .plan(None, json!({ "name": name, "can_login": true, "connection_limit": 10 }))
        .unwrap();
    assert_eq!(plan.action, PlanAction::Create);

    let created = resource.create(plan.planned_state).await.unwrap();
    assert!(created["oid"].as_i64().unwrap() > 0);
    assert_eq!(created["name"], name.as_str());
    assert_eq!(created["can_login"], true);
    assert_eq!(created["connection_limit"], 10);
    assert_eq!(created["inherit"], true);

    let read = resource.read(created.clone()).await.unwrap().expect("role exists");
    assert_eq!(read, created);

    let plan = resource
        .plan(Some(&read), json!({ "name": name, "can_login": false, "connection_limit": 10 }))
        .unwrap();
    assert_eq!(plan.action, PlanAction::Update);
    let updated = resource.update(read.clone(), plan.planned_state).await.unwrap();
    assert_eq!(updated["oid"], read["oid"]);
    assert_eq!(updated["can_login"], false);
    assert_eq!(updated["connection_limit"], 10);

    resource.delete(updated.clone()).await.unwrap();

    // A vanished role reads as absent rather than failing.
    assert!(resource.read(updated).await.unwrap().is_none());
}

#[tokio::test]
async fn test_import_then_read() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    let resource = provider.resource("postgresql_role").unwrap();
    let name = unique_role_name("import");

    let created = resource
        .create(json!({ "name": name, "replication": true }))
        .await
        .unwrap();

    let imported = resource.import(&name).unwrap();
    assert_eq!(imported, json!({ "name": name }));

    let read = resource.read(imported).await.unwrap().expect("role exists");
    assert_eq!(read, created);

    cleanup(&provider, &name).await;
}

#[tokio::test]
async fn test_import_missing_role_reads_absent() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    let resource = provider.resource("postgresql_role").unwrap();

    let imported = resource.import(&unique_role_name("ghost")).unwrap();
    assert!(resource.read(imported).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_rejects_rename() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    let resource = provider.resource("postgresql_role").unwrap();
    let name = unique_role_name("rename");

    let created = resource.create(json!({ "name": name })).await.unwrap();
    let err = resource
        .update(created, json!({ "name": format!("{}_new", name) }))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RequiresReplace("name")));

    cleanup(&provider, &name).await;
}

#[tokio::test]
async fn test_duplicate_create_fails() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    let resource = provider.resource("postgresql_role").unwrap();
    let name = unique_role_name("dup");

    resource.create(json!({ "name": name })).await.unwrap();
    let err = resource.create(json!({ "name": name })).await.unwrap_err();
    assert!(matches!(err, ProviderError::Db(ref db) if db.is_statement_error()), "{err}");

    cleanup(&provider, &name).await;
}

#[tokio::test]
async fn test_unknown_resource_type() {
    let Some(provider) = configured_provider().await else {
        return;
    };
    assert!(matches!(
        provider.resource("postgresql_database"),
        Err(ProviderError::UnknownResourceType(_))
    ));
}
