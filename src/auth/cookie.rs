use crate::config::CookieConfig;

const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &str, cfg: &CookieConfig) -> String {
    let max_age = cfg.expire_days.max(0).saturating_mul(24 * 60 * 60);
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cfg.name, token, max_age
    );
    if cfg.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Overwrites the session cookie with an already expired one.
pub fn clear_cookie(cfg: &CookieConfig) -> String {
    let mut cookie = format!(
        "{}=none; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires={}",
        cfg.name, EPOCH
    );
    if cfg.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Finds `name` in a raw `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty() && *v != "none")
}
