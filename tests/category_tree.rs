//! Category hierarchy invariants under creation and reparenting
//!
//! For every category: `level == ancestors.len()`, roots have no parent and
//! empty ancestors, and a child's ancestors are its parent's ancestors plus
//! the parent itself.

use storefront_server::auth::JwtConfig;
use storefront_server::core::ShippingRates;
use storefront_server::db::models::{Category, CategoryCreate};
use storefront_server::db::repository::CategoryRepository;
use storefront_server::{AppState, Config, HierarchyManager};

fn test_config() -> Config {
    Config {
        data_dir: ".".to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "test-secret-test-secret-test-secret".to_string(),
            expiration_minutes: 60,
            issuer: "storefront-server".to_string(),
            audience: "storefront-clients".to_string(),
        },
        environment: "test".to_string(),
        tax_rate_percent: 8.0,
        shipping: ShippingRates::default(),
        order_number_prefix: "ORD".to_string(),
    }
}

async fn setup() -> (CategoryRepository, HierarchyManager) {
    let state = AppState::initialize_in_memory(&test_config()).await;
    let repo = CategoryRepository::new(state.db.clone());
    let manager = HierarchyManager::new(state.db.clone(), state.reparent_locks.clone());
    (repo, manager)
}

async fn create(repo: &CategoryRepository, name: &str, parent: Option<&Category>) -> Category {
    repo.create(CategoryCreate {
        name: name.to_string(),
        slug: None,
        description: None,
        parent: parent.map(|p| p.id.as_ref().unwrap().to_string()),
        is_featured: None,
        sort_order: None,
    })
    .await
    .expect("create category")
}

async fn reload(repo: &CategoryRepository, category: &Category) -> Category {
    repo.find_by_id(&category.id.as_ref().unwrap().to_string())
        .await
        .expect("find")
        .expect("exists")
}

fn assert_invariants(category: &Category) {
    assert_eq!(
        category.level as usize,
        category.ancestors.len(),
        "level must equal ancestors length for {}",
        category.name
    );
    if category.parent.is_none() {
        assert!(category.ancestors.is_empty());
        assert_eq!(category.level, 0);
    } else {
        assert_eq!(
            category.ancestors.last(),
            category.parent.as_ref(),
            "last ancestor must be the parent for {}",
            category.name
        );
    }
}

#[tokio::test]
async fn test_creation_seeds_hierarchy_fields() {
    let (repo, _manager) = setup().await;

    let root = create(&repo, "Electronics", None).await;
    let child = create(&repo, "Audio", Some(&root)).await;
    let grandchild = create(&repo, "Headphones", Some(&child)).await;

    assert_invariants(&root);
    assert_invariants(&child);
    assert_invariants(&grandchild);

    assert_eq!(root.level, 0);
    assert_eq!(child.level, 1);
    assert_eq!(child.ancestors, vec![root.id.clone().unwrap()]);
    assert_eq!(grandchild.level, 2);
    assert_eq!(
        grandchild.ancestors,
        vec![root.id.clone().unwrap(), child.id.clone().unwrap()]
    );
}

#[tokio::test]
async fn test_duplicate_slug_rejected() {
    let (repo, _manager) = setup().await;

    create(&repo, "Electronics", None).await;
    let err = repo
        .create(CategoryCreate {
            name: "Electronics".to_string(),
            slug: None,
            description: None,
            parent: None,
            is_featured: None,
            sort_order: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_reparent_cascades_through_subtree() {
    let (repo, manager) = setup().await;

    // A(root) -> B -> C, plus an unrelated root D
    let a = create(&repo, "A", None).await;
    let b = create(&repo, "B", Some(&a)).await;
    let c = create(&repo, "C", Some(&b)).await;
    let d = create(&repo, "D", None).await;

    let a_id = a.id.clone().unwrap();
    let b_id = b.id.clone().unwrap();
    let d_id = d.id.clone().unwrap();

    // Move A (and its whole subtree) under D
    let moved = manager
        .reparent(&a_id.to_string(), Some(&d_id.to_string()))
        .await
        .expect("reparent");

    assert_eq!(moved.level, 1);
    assert_eq!(moved.ancestors, vec![d_id.clone()]);
    assert_eq!(moved.parent, Some(d_id.clone()));

    let b = reload(&repo, &b).await;
    assert_eq!(b.level, 2);
    assert_eq!(b.ancestors, vec![d_id.clone(), a_id.clone()]);

    let c = reload(&repo, &c).await;
    assert_eq!(c.level, 3);
    assert_eq!(c.ancestors, vec![d_id.clone(), a_id.clone(), b_id.clone()]);

    for category in [&moved, &b, &c] {
        assert_invariants(category);
    }
}

#[tokio::test]
async fn test_reparent_to_root() {
    let (repo, manager) = setup().await;

    let a = create(&repo, "A", None).await;
    let b = create(&repo, "B", Some(&a)).await;
    let c = create(&repo, "C", Some(&b)).await;

    let promoted = manager
        .reparent(&b.id.as_ref().unwrap().to_string(), None)
        .await
        .expect("promote to root");

    assert_eq!(promoted.level, 0);
    assert!(promoted.parent.is_none());
    assert!(promoted.ancestors.is_empty());

    let c = reload(&repo, &c).await;
    assert_eq!(c.level, 1);
    assert_eq!(c.ancestors, vec![b.id.clone().unwrap()]);

    // A keeps its root status and loses its child
    let a = reload(&repo, &a).await;
    assert_eq!(a.level, 0);
    assert!(manager.roots().await.unwrap().len() >= 2);
}

#[tokio::test]
async fn test_reparent_missing_endpoint_fails() {
    let (repo, manager) = setup().await;
    let a = create(&repo, "A", None).await;

    let err = manager
        .reparent(&a.id.as_ref().unwrap().to_string(), Some("category:missing"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));

    let err = manager.reparent("category:missing", None).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_tree_marks_parents() {
    let (repo, manager) = setup().await;

    let root = create(&repo, "Electronics", None).await;
    let leaf = create(&repo, "Audio", Some(&root)).await;

    let tree = manager.tree().await.expect("tree");
    assert_eq!(tree.len(), 2);

    let root_node = tree
        .iter()
        .find(|n| n.category.id == root.id)
        .expect("root in tree");
    assert!(root_node.has_children);

    let leaf_node = tree
        .iter()
        .find(|n| n.category.id == leaf.id)
        .expect("leaf in tree");
    assert!(!leaf_node.has_children);
}

#[tokio::test]
async fn test_path_is_root_first() {
    let (repo, manager) = setup().await;

    let root = create(&repo, "Electronics", None).await;
    let mid = create(&repo, "Audio", Some(&root)).await;
    let leaf = create(&repo, "Headphones", Some(&mid)).await;

    let path = manager
        .path(&leaf.id.as_ref().unwrap().to_string())
        .await
        .expect("path");

    let names: Vec<&str> = path.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Electronics", "Audio", "Headphones"]);
}

#[tokio::test]
async fn test_level_listing() {
    let (repo, manager) = setup().await;

    let root_a = create(&repo, "A", None).await;
    let _root_b = create(&repo, "B", None).await;
    let _child = create(&repo, "A1", Some(&root_a)).await;

    assert_eq!(manager.at_level(0).await.unwrap().len(), 2);
    assert_eq!(manager.at_level(1).await.unwrap().len(), 1);
    assert!(manager.at_level(2).await.unwrap().is_empty());
}
