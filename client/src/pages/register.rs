//! Account registration page.
//!
//! A successful registration does not sign the user in; the page shows the
//! backend's confirmation and moves to the login route after a short delay.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::time::Duration;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use secrecy::SecretString;

use crate::app::SessionContext;
use crate::config::LOGIN_PATH;
use crate::net::types::RegistrationRequest;
use crate::util::runtime::{BrowserTimer, Timer};

/// Raw form input as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistrationForm {
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm_password: String,
}

impl RegistrationForm {
    /// Trim text fields and check every field is present and the passwords
    /// agree. Passwords are not trimmed.
    fn validate(&self) -> Result<RegistrationRequest, &'static str> {
        let username = self.username.trim();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();
        if [username, first_name, last_name, email].iter().any(|v| v.is_empty()) || self.password.is_empty() {
            return Err("Fill in all fields.");
        }
        if !email.contains('@') {
            return Err("Enter a valid email address.");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.");
        }
        Ok(RegistrationRequest {
            username: username.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
            password: SecretString::new(self.password.clone()),
        })
    }
}

/// Wait out `delay`, then report whether the page is still mounted.
async fn still_mounted_after(timer: &dyn Timer, delay: Duration, mounted: impl Fn() -> bool) -> bool {
    timer.sleep(delay).await;
    mounted()
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let form = RwSignal::new(RegistrationForm::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let done = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() || done.get() {
            return;
        }
        let request = match form.with(RegistrationForm::validate) {
            Ok(request) => request,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let Some(session) = ctx.session() else {
            return;
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let navigate = navigate.clone();
        let delay = ctx.registration_redirect_delay();
        leptos::task::spawn_local(async move {
            match session.gateway().register(request).await {
                Ok(echo) => {
                    let _ = form.try_update(|f| {
                        f.password.clear();
                        f.confirm_password.clear();
                    });
                    let _ = done.try_set(true);
                    let _ = info.try_set(format!("{} Redirecting to login...", echo.message));
                    if still_mounted_after(&BrowserTimer, delay, move || done.try_get().is_some()).await {
                        navigate(LOGIN_PATH, NavigateOptions::default());
                    }
                }
                Err(err) => {
                    let _ = info.try_set(err.user_message());
                }
            }
            let _ = busy.try_set(false);
        });
    };

    let field = move |placeholder: &'static str,
                      kind: &'static str,
                      get: fn(&RegistrationForm) -> String,
                      set: fn(&mut RegistrationForm, String)| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=placeholder
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Budget"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    {field("Username", "text", |f| f.username.clone(), |f, v| f.username = v)}
                    {field("First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                    {field("Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                    {field("Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                    {field("Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                    {field(
                        "Confirm password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                    )}
                    <button class="login-button" type="submit" disabled=move || busy.get() || done.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <A href=LOGIN_PATH>"Log in"</A>
                </p>
            </div>
        </div>
    }
}
