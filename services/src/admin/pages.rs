//! Page templates wrapping rendered tables.

use debug_api_table::{Markup, Tz, markup::escape};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// A complete HTML document around `body`.
pub fn layout(title: &str, body: &Markup) -> String {
    format!(
        "<!DOCTYPE html>\
<html lang=\"en\">\
<head>\
<meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title>\
<script src=\"{TAILWIND_CDN}\"></script>\
</head>\
<body class=\"bg-gray-100 text-gray-900\">{body}</body>\
</html>",
        title = escape(title),
    )
}

/// Form posting to `/things/create`. Browsers send `Accept: text/html`,
/// so a successful post redirects back to the admin page.
pub fn create_form() -> Markup {
    Markup::raw(
        "<form action=\"/things/create\" method=\"POST\" class=\"w-full max-w-md space-y-2\">\
<label class=\"block text-gray-700 text-sm font-bold\">Name:\
<input type=\"text\" name=\"name\" class=\"w-full border rounded px-2 py-1 font-normal\" required>\
</label>\
<label class=\"block text-gray-700 text-sm font-bold\">Description:\
<input type=\"text\" name=\"description\" class=\"w-full border rounded px-2 py-1 font-normal\" required>\
</label>\
<label class=\"block text-gray-700 text-sm font-bold\">Metadata (JSON, optional):\
<textarea name=\"metadata\" rows=\"3\" class=\"w-full border rounded px-2 py-1 font-mono font-normal\"></textarea>\
</label>\
<button type=\"submit\" class=\"bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded\">Create Thing</button>\
</form>",
    )
}

/// Per-row delete button, carried into the table as a pre-rendered cell.
pub fn delete_control(thing_id: &str, name: &str) -> Markup {
    let confirm = format!("Are you sure you want to delete \"{name}\"?");
    // Serialize to a JS string literal before attribute escaping.
    let confirm = serde_json::to_string(&confirm).unwrap_or_else(|_| "\"\"".to_owned());
    Markup::raw(format!(
        "<form action=\"/things/delete\" method=\"POST\" onsubmit=\"return confirm({confirm})\">\
<input type=\"hidden\" name=\"thing_id\" value=\"{thing_id}\">\
<button type=\"submit\" class=\"bg-red-500 hover:bg-red-700 text-white font-bold py-1 px-3 rounded\">Delete</button>\
</form>",
        confirm = escape(&confirm),
        thing_id = escape(thing_id),
    ))
}

fn timezone_note(timezone: Tz) -> Markup {
    Markup::text(format!("Times shown in {}", timezone.name()))
        .wrap("p", Some("text-xs text-gray-500 mt-2"))
}

fn section(heading: &str, content: &Markup) -> Markup {
    let mut out = Markup::text(heading).wrap("h2", Some("text-lg font-semibold mb-2"));
    out.push(content);
    out.wrap("div", Some("mb-6"))
}

fn page(heading: &str, content: Markup) -> Markup {
    let mut out = Markup::text(heading).wrap("h1", Some("text-2xl font-bold mb-4"));
    out.push(&content);
    out.wrap("div", Some("p-4"))
}

/// `/_fake/admin`: create form and the things table.
pub fn admin_page(table: &Markup, timezone: Tz) -> String {
    let mut content = section("Create New Thing", &create_form());
    let mut listing = table.clone();
    listing.push(&timezone_note(timezone));
    content.push(&section("Thing Resources", &listing));
    layout("Thing Resources Admin", &page("Thing Resources Admin", content))
}

/// `/_fake/admin/things/list`
pub fn thing_list_page(table: &Markup, timezone: Tz) -> String {
    let mut content = table.clone();
    content.push(&timezone_note(timezone));
    layout("Things", &page("Things", content))
}

/// `/_fake/admin/things/get`
pub fn thing_page(name: &str, table: &Markup, timezone: Tz) -> String {
    let mut content = Markup::raw(
        "<p class=\"mb-4\"><a href=\"/_fake/admin\" class=\"text-blue-500 hover:underline\">Back to admin</a></p>",
    );
    content.push(table);
    content.push(&timezone_note(timezone));
    layout(name, &page(name, content))
}

/// A page carrying a single message, used for errors.
pub fn message_page(title: &str, message: &str) -> String {
    let content = Markup::text(message).wrap("p", Some("text-gray-700"));
    layout(title, &page(title, content))
}
