mod common;

use common::{category_json, signed_in};
use medadmin::modules::CategoryForm;
use medadmin_core::{FileUpload, PageRequest, UploadPolicy};
use medadmin_models::{CategoryFilters, CategoryId};

#[tokio::test]
async fn test_create_category_uses_nested_endpoint() {
    let (backend, state, _store) = signed_in().await;
    let form = CategoryForm {
        description: Some("Heart and vessels".into()),
        ..CategoryForm::new("Cardiology")
    };

    let category = state.categories().create(form).await.unwrap();

    assert_eq!(category.name, "Cardiology");
    let request = backend
        .last_request_to("POST", "/doctors/categories")
        .unwrap();
    assert_eq!(request.field("name"), Some("Cardiology"));
    assert_eq!(request.field("description"), Some("Heart and vessels"));
    assert!(request.field("parentId").is_none());
    assert!(request.files.is_empty());
    assert!(backend.requests_to("POST", "/doctors").is_empty());
}

#[tokio::test]
async fn test_create_category_with_svg_icon() {
    let (backend, state, _store) = signed_in().await;
    let icon = FileUpload::from_bytes(
        "heart.svg",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec(),
        &UploadPolicy::icons(),
    )
    .unwrap();
    let form = CategoryForm {
        icon: Some(icon),
        parent_id: Some("category-root".into()),
        ..CategoryForm::new("Paediatric Cardiology")
    };

    let category = state.categories().create(form).await.unwrap();

    assert_eq!(category.icon_url.as_deref(), Some("https://cdn.test/heart.svg"));
    assert_eq!(category.parent_id, Some(CategoryId::new("category-root")));
    let request = backend
        .last_request_to("POST", "/doctors/categories")
        .unwrap();
    assert!(request.has_file("icon"));
}

#[test]
fn test_svg_is_not_accepted_as_photo() {
    let result = FileUpload::from_bytes("heart.svg", b"<svg/>".to_vec(), &UploadPolicy::images());

    assert!(result.is_err());
}

#[tokio::test]
async fn test_blank_category_name_is_rejected_locally() {
    let (backend, state, _store) = signed_in().await;

    let err = state
        .categories()
        .create(CategoryForm::new("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, medadmin_core::ApiError::Validation { .. }));
    assert!(backend.requests_to("POST", "/doctors/categories").is_empty());
}

#[tokio::test]
async fn test_update_and_delete_category() {
    let (backend, state, _store) = signed_in().await;
    let existing = category_json("Dermatology");
    let id = CategoryId::new(existing["id"].as_str().unwrap());
    backend.seed("categories", vec![existing]);

    let category = state.categories().get(&id).await.unwrap().unwrap();
    let mut form = CategoryForm::from_category(&category);
    form.name = "Dermatology & Venereology".into();
    let updated = state.categories().update(&id, form).await.unwrap();
    assert_eq!(updated.name, "Dermatology & Venereology");

    let patch = backend
        .last_request_to("PATCH", &format!("/doctors/categories/{}", id))
        .unwrap();
    assert_eq!(patch.field("description"), Some("Dermatology specialists"));

    state.categories().delete(&id).await.unwrap();
    assert!(backend.items("categories").is_empty());
}

#[tokio::test]
async fn test_options_fetches_every_category_in_one_page() {
    let (backend, state, _store) = signed_in().await;
    backend.seed(
        "categories",
        (0..25)
            .map(|i| category_json(&format!("Speciality {}", i)))
            .collect(),
    );

    let options = state.categories().options().await.unwrap();

    assert_eq!(options.len(), 25);
    let request = backend
        .last_request_to("GET", "/doctors/categories")
        .unwrap();
    assert_eq!(request.query_value("page"), Some("1"));
    assert_eq!(request.query_value("limit"), Some("100"));
}

#[tokio::test]
async fn test_list_subcategories_by_parent() {
    let (backend, state, _store) = signed_in().await;
    let mut child = category_json("Neonatology");
    child["parentId"] = "category-paediatrics".into();
    backend.seed("categories", vec![child, category_json("Oncology")]);

    let filters = CategoryFilters {
        parent_id: Some(CategoryId::new("category-paediatrics")),
        ..Default::default()
    };
    let page = state
        .categories()
        .list(&PageRequest::new(1, 10).with_filters(filters.into_filters()))
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "Neonatology");
}
