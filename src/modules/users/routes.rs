use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};

use libris_http::AppResult;

use super::forms::{LoginForm, RegisterForm};
use super::models::{NewUser, UserRepo};
use super::password::{hash_password_blocking, verify_password_blocking};
use super::UsersState;
use crate::utils::render;

const AFTER_AUTH_URL: &str = "/catalog";
const REGISTER_TITLE: &str = "Local Library | Sign Up";
const LOGIN_TITLE: &str = "Local Library | Login";

pub const EMAIL_TAKEN: &str = "Email is already registered.";
pub const NOT_REGISTERED: &str = "User is not registered.";
pub const INVALID_CREDENTIALS: &str = "Invalid Login Credentials";

#[derive(Template)]
#[template(path = "user_register_form.html")]
pub struct UserRegisterTemplate {
    pub title: String,
    pub form: RegisterForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "user_login_form.html")]
pub struct UserLoginTemplate {
    pub title: String,
    pub form: LoginForm,
    pub errors: Vec<String>,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/cool", get(cool))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .with_state(state)
}

async fn index() -> &'static str {
    "respond with a resource"
}

async fn cool() -> &'static str {
    "You're so cool!"
}

fn register_page(form: &RegisterForm, errors: Vec<String>) -> AppResult<Response> {
    Ok(render(&UserRegisterTemplate {
        title: REGISTER_TITLE.to_string(),
        form: form.redacted(),
        errors,
    })?
    .into_response())
}

fn login_page(form: &LoginForm, errors: Vec<String>) -> AppResult<Response> {
    Ok(render(&UserLoginTemplate {
        title: LOGIN_TITLE.to_string(),
        form: form.redacted(),
        errors,
    })?
    .into_response())
}

async fn register_form() -> AppResult<Response> {
    register_page(&RegisterForm::default(), Vec::new())
}

async fn register(
    State(state): State<UsersState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => return register_page(&form, errors.messages()),
    };

    let repo = UserRepo::new(&state.db);
    if repo.find_by_email(&registration.email).await?.is_some() {
        return register_page(&form, vec![EMAIL_TAKEN.to_string()]);
    }

    let password_hash = hash_password_blocking(registration.password).await?;
    let new_user = NewUser {
        name: registration.name,
        email: registration.email,
        password_hash,
    };

    match repo.insert(&new_user).await {
        Ok(user) => {
            tracing::info!(user = %user.id, "user registered");
            Ok(Redirect::to(AFTER_AUTH_URL).into_response())
        }
        Err(err) if libris_db::is_unique_violation(&err) => {
            register_page(&form, vec![EMAIL_TAKEN.to_string()])
        }
        Err(err) => Err(err.into()),
    }
}

async fn login_form() -> AppResult<Response> {
    login_page(&LoginForm::default(), Vec::new())
}

async fn login(
    State(state): State<UsersState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let (email, password) = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return login_page(&form, errors.messages()),
    };

    let Some(user) = UserRepo::new(&state.db).find_by_email(&email).await? else {
        return login_page(&form, vec![NOT_REGISTERED.to_string()]);
    };

    if !verify_password_blocking(password, user.password_hash).await? {
        tracing::debug!(user = %user.id, "login rejected");
        return login_page(&form, vec![INVALID_CREDENTIALS.to_string()]);
    }

    tracing::info!(user = %user.id, "user logged in");
    Ok(Redirect::to(AFTER_AUTH_URL).into_response())
}
