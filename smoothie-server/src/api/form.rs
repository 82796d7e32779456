//! Browser order form
//!
//! `GET /` renders a fresh form. `POST /` carries the whole form state
//! back (`name_on_order`, repeated `ingredients`, `action`) and re-renders
//! it; `action=submit` also places the order.

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use serde_json::Value;
use shared::error::AppError;
use shared::models::MAX_INGREDIENTS;

use crate::metadata::MetadataError;
use crate::order::{FormEvent, FormPhase, OrderForm, PendingSelection, SelectionError};
use crate::state::AppState;
use crate::warehouse::Warehouse;

pub const PAGE_TITLE: &str = "🥤 Customize your Smoothie! 🥤";
const INTRO: &str = "Choose the fruits that you want in your custom smoothie:";
const NAME_LABEL: &str = "Name on Smoothie";
const NAME_ECHO: &str = "The name of your smoothie will be:";
const INGREDIENTS_LABEL: &str = "Choose up to 5 ingredients";
const SUBMIT_LABEL: &str = "Submit Order";

/// Form fields of one POST
#[derive(Debug, Default, PartialEq, Eq)]
struct FormInput {
    name_on_order: String,
    ingredients: Vec<String>,
    event: FormEvent,
}

impl FormInput {
    /// Unknown keys are ignored; anything but `action=submit` is a refresh
    fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut input = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "name_on_order" => input.name_on_order = value,
                "ingredients" => input.ingredients.push(value),
                "action" if value == "submit" => input.event = FormEvent::Submit,
                _ => {}
            }
        }
        input
    }
}

/// GET /
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
    run(&state, FormInput::default()).await
}

/// POST /
pub async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Html<String> {
    run(&state, FormInput::from_fields(fields)).await
}

async fn run(state: &AppState, input: FormInput) -> Html<String> {
    let (outcome, metadata) = tokio::join!(
        run_form(state.warehouse.as_ref(), input),
        state.metadata.fetch_logged(),
    );
    let (form, rejected) = outcome;
    Html(render(&form, &rejected, &metadata))
}

/// Replay the posted selection through the multi-select rules, then apply
/// the event. A selection the widget would not have allowed is shown
/// back instead of submitted.
async fn run_form(warehouse: &dyn Warehouse, input: FormInput) -> (OrderForm, Vec<SelectionError>) {
    let mut form = OrderForm::open(warehouse, PendingSelection::new(input.name_on_order)).await;
    let rejected: Vec<SelectionError> = input
        .ingredients
        .iter()
        .filter_map(|name| form.select(name).err())
        .collect();

    let event = if rejected.is_empty() {
        input.event
    } else {
        FormEvent::Refresh
    };
    form.handle(warehouse, event).await;
    (form, rejected)
}

fn render(
    form: &OrderForm,
    rejected: &[SelectionError],
    metadata: &Result<Value, MetadataError>,
) -> String {
    let selection = form.selection();
    let mut page = String::with_capacity(4096);

    page.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!(
        "<title>{}</title>\n</head>\n<body>\n",
        escape(PAGE_TITLE)
    ));
    page.push_str(&format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        escape(PAGE_TITLE),
        escape(INTRO)
    ));

    if let Some(warning) = form.catalog().warning() {
        page.push_str(&banner("warning", &warning.message));
    }
    for err in rejected {
        page.push_str(&banner("warning", &err.to_string()));
    }
    match form.phase() {
        FormPhase::Collecting => {}
        FormPhase::Succeeded(confirmation) => {
            page.push_str(&format!(
                "<div class=\"success\">✅ {}<br>Ordered for {}: {}</div>\n",
                escape(&confirmation.message),
                escape(&confirmation.order.name_on_order),
                escape(&confirmation.order.ingredients),
            ));
        }
        FormPhase::Failed(err) => {
            page.push_str(&banner("error", &AppError::from(err).message));
        }
    }

    page.push_str("<form method=\"post\" action=\"/\">\n");
    page.push_str(&format!(
        "<label>{} <input type=\"text\" name=\"name_on_order\" value=\"{}\"></label>\n",
        escape(NAME_LABEL),
        escape(selection.name_on_order()),
    ));
    page.push_str(&format!(
        "<p>{} {}</p>\n",
        escape(NAME_ECHO),
        escape(selection.name_on_order()),
    ));

    page.push_str(&format!(
        "<label>{} <select name=\"ingredients\" multiple size=\"{}\">\n",
        escape(INGREDIENTS_LABEL),
        form.catalog().options().len().clamp(MAX_INGREDIENTS, 12),
    ));
    for option in form.catalog().options() {
        let selected = if selection.is_selected(&option.name) {
            " selected"
        } else {
            ""
        };
        page.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape(&option.name),
            selected,
        ));
    }
    page.push_str("</select></label>\n");

    page.push_str("<button type=\"submit\" name=\"action\" value=\"update\">Update</button>\n");
    page.push_str(&format!(
        "<button type=\"submit\" name=\"action\" value=\"submit\">{}</button>\n</form>\n",
        escape(SUBMIT_LABEL),
    ));

    page.push_str("<h2>Fruit information</h2>\n");
    match metadata {
        Ok(body) => {
            let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            page.push_str(&format!("<pre>{}</pre>\n", escape(&pretty)));
        }
        Err(err) => page.push_str(&banner("warning", &AppError::from(err).message)),
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn banner(class: &str, message: &str) -> String {
    format!("<div class=\"{class}\">{}</div>\n", escape(message))
}

/// Escape text for HTML element content and quoted attributes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
