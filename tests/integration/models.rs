use spaark_loader::ModelPriority;

use crate::integration::support::{unit, AppTree};

#[test]
fn application_model_is_tried_first() {
    let tree = AppTree::new();
    tree.write("model/user.unit.toml", &unit("App.Model.User"));
    tree.write("spaark/core/model/user.unit.toml", &unit("Spaark.Core.Model.User"));

    let mut loader = tree.loader();
    let resolved = loader.load_model("User", None).unwrap().unwrap();
    assert_eq!(resolved.to_string(), "app.Model.User");
    assert!(!loader.exists("Spaark.Core.Model.User"));
}

#[test]
fn framework_model_is_the_fallback() {
    let tree = AppTree::new();
    tree.write("spaark/core/model/user.unit.toml", &unit("Spaark.Core.Model.User"));

    let mut loader = tree.loader();
    let resolved = loader.load_model("User", None).unwrap().unwrap();
    assert_eq!(resolved.to_string(), "Spaark.Core.Model.User");

    let tried: Vec<String> = loader
        .last_attempts()
        .iter()
        .map(|a| a.name.to_lowercase())
        .collect();
    assert_eq!(tried.first().map(String::as_str), Some("app.model.user"));
}

#[test]
fn missing_model_is_none() {
    let tree = AppTree::new();
    let mut loader = tree.loader();
    assert!(loader.load_model("User", None).unwrap().is_none());
    assert!(loader.load_model("User", Some("App.Local")).unwrap().is_none());
}

#[test]
fn local_scope_wins_over_model_namespaces() {
    let tree = AppTree::new();
    tree.write("shop/model/order.unit.toml", &unit("App.Shop.Model.Order"));
    tree.write("model/order.unit.toml", &unit("App.Model.Order"));

    let mut loader = tree.loader();
    let resolved = loader
        .load_model("Order", Some("App.Shop.Model"))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.to_string(), "App.Shop.Model.Order");
    assert!(!loader.exists("App.Model.Order"));
}

#[test]
fn registration_order_searches_framework_first() {
    let tree = AppTree::new();
    tree.write("model/user.unit.toml", &unit("App.Model.User"));
    tree.write("spaark/core/model/user.unit.toml", &unit("Spaark.Core.Model.User"));

    let mut loader = tree.loader_with_priority(ModelPriority::RegistrationOrder);
    let resolved = loader.load_model("User", None).unwrap().unwrap();
    assert_eq!(resolved.to_string(), "Spaark.Core.Model.User");
}

#[test]
fn nested_model_names_map_to_subdirectories() {
    let tree = AppTree::new();
    tree.write("model/billing/invoice.unit.toml", &unit("App.Model.Billing.Invoice"));

    let mut loader = tree.loader();
    let resolved = loader.load_model("Billing.Invoice", None).unwrap().unwrap();
    assert_eq!(resolved.to_string().to_lowercase(), "app.model.billing.invoice");
}
