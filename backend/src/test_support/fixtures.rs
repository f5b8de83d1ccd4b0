//! Record builders with sensible defaults.

use serde_json::{Map, Value};

use crate::domain::{
    AdminUser, Framework, FrameworkStatus, Service, ServiceId, SupplierRef, UserAccount,
};

pub fn framework(id: u64, slug: &str, name: &str, status: FrameworkStatus) -> Framework {
    Framework {
        id,
        slug: slug.to_owned(),
        name: name.to_owned(),
        status,
        framework_agreement_version: None,
    }
}

/// A staff account with `role`; the address is derived from the role.
pub fn admin(id: u64, role: &str) -> AdminUser {
    AdminUser {
        id,
        name: format!("Test {role}"),
        email_address: format!("{role}@example.gov"),
        role: role.to_owned(),
    }
}

fn account(id: u64, email_address: &str, role: &str) -> UserAccount {
    UserAccount {
        id,
        name: format!("User {id}"),
        email_address: email_address.to_owned(),
        role: role.to_owned(),
        phone_number: None,
        supplier: None,
        active: true,
        locked: false,
        personal_data_removed: false,
        user_research_opted_in: false,
        logged_in_at: None,
        password_changed_at: None,
        created_at: None,
    }
}

pub fn buyer(id: u64, email_address: &str, user_research_opted_in: bool) -> UserAccount {
    UserAccount {
        user_research_opted_in,
        ..account(id, email_address, "buyer")
    }
}

pub fn supplier_user(id: u64, email_address: &str, supplier_id: u64) -> UserAccount {
    UserAccount {
        supplier: Some(SupplierRef {
            supplier_id,
            name: format!("Supplier {supplier_id}"),
        }),
        ..account(id, email_address, "supplier")
    }
}

/// A service with extra fields from a JSON object; non-objects add nothing.
pub fn service(id: &str, supplier_id: u64, fields: Value) -> Service {
    let fields = match fields {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    Service {
        id: ServiceId::new(id),
        supplier_id,
        fields,
    }
}
