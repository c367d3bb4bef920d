use crate::domain_model::AdminProfile;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body></html>\n",
        escape(title),
        body
    )
}

pub fn login_page(error: Option<&str>, email: &str) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Admin login</h1>
{error}<form method="post" action="/admin/login">
<label>Email <input type="email" name="email" value="{email}"></label>
<label>Password <input type="password" name="password"></label>
<label><input type="checkbox" name="remember"> Remember me</label>
<button type="submit">Log in</button>
</form>
<p><a href="/admin/forget-password">Forgot your password?</a></p>"#,
        email = escape(email),
    );
    layout("Admin login", &body)
}

/// No self-service reset exists; the page points at another admin.
pub fn forget_password_page() -> String {
    let body = r#"<h1>Forget password</h1>
<p>Password resets are handled by another administrator. Ask them to set a new password for your account.</p>
<nav><a href="/admin/login">Back to login</a></nav>"#;
    layout("Forget Password", body)
}

pub fn dashboard_page(admin: &AdminProfile) -> String {
    let body = format!(
        r#"<h1>Dashboard</h1>
<p>Welcome, {}.</p>
<nav><a href="/admin/logout">Log out</a></nav>"#,
        escape(&admin.name)
    );
    layout("Dashboard", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_is_escaped() {
        let html = login_page(Some("<b>bad</b>"), "\"x\"@example.com");
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("&quot;x&quot;@example.com"));
        assert!(!html.contains("<b>bad"));
    }

    #[test]
    fn login_page_links_the_forget_password_page() {
        assert!(login_page(None, "").contains("href=\"/admin/forget-password\""));
        assert!(forget_password_page().contains("<title>Forget Password</title>"));
    }
}
