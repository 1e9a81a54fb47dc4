//! Account commands.
//!
//! A successful login or signup stores the bearer token in the state
//! directory, so later invocations (orders, checkout, admin) run
//! authenticated until `logout`.
//!
//! # Usage
//!
//! ```bash
//! sm-cli signup -n "Ali Raza" -e you@example.com -p secret
//! sm-cli login -e you@example.com -p secret
//! sm-cli orders
//! sm-cli logout
//! ```

use synergy_storefront::api::types::SignupRequest;

use super::{open_shop, open_shop_online};

/// Sign in with an existing account.
///
/// # Errors
///
/// Returns an error when the backend rejects the credentials.
pub async fn login(email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.login(email, password).await?;

    let name = shop
        .session()
        .user()
        .map_or_else(|| email.to_owned(), |u| u.name.clone());
    println!("Signed in as {name}.");
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns an error when the backend rejects the signup.
pub async fn signup(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.signup(&SignupRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    })
    .await?;

    println!("Account created. Signed in as {name}.");
    Ok(())
}

/// Sign out and drop the stored credential.
///
/// # Errors
///
/// Returns an error if the shop cannot be opened.
pub fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.logout();
    println!("Signed out.");
    Ok(())
}

/// List the signed-in user's orders, newest first.
///
/// # Errors
///
/// Returns an error when not signed in or the fetch fails.
pub async fn orders() -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop_online().await?;

    if !shop.is_authenticated() {
        return Err("not signed in; run `sm-cli login` first".into());
    }

    let orders = shop.session().orders();
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in orders {
        let placed = order
            .created_at
            .map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%d").to_string());
        println!(
            "{}  {}  {}  {}",
            order.id, placed, order.status, order.total_price
        );
    }

    Ok(())
}
