// vitrin/src/i18n.rs

//! Locale negotiation and the handful of user-facing message strings the
//! API localizes. Resolution is a string-prefix check on the request path
//! (`/en/...`) with `Accept-Language` as the fallback.

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
  #[default]
  Tr,
  En,
}

impl Locale {
  pub fn from_tag(tag: &str) -> Option<Locale> {
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    match primary.to_ascii_lowercase().as_str() {
      "tr" => Some(Locale::Tr),
      "en" => Some(Locale::En),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Locale::Tr => "tr",
      Locale::En => "en",
    }
  }

  /// Splits a locale prefix off a request path: `/en/products` becomes
  /// `(Some(En), "/products")`. Paths without a recognized prefix pass
  /// through unchanged.
  pub fn strip_path_prefix(path: &str) -> (Option<Locale>, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (head, rest) = match trimmed.split_once('/') {
      Some((head, rest)) => (head, rest),
      None => (trimmed, ""),
    };
    match Locale::from_tag(head) {
      Some(locale) if !head.is_empty() => {
        let remainder = if rest.is_empty() { "/" } else { &path[1 + head.len()..] };
        (Some(locale), remainder)
      }
      _ => (None, path),
    }
  }

  /// Path prefix wins; otherwise the first supported tag in
  /// `Accept-Language`; otherwise the site default (Turkish).
  pub fn negotiate(path: &str, accept_language: Option<&str>) -> Locale {
    if let (Some(locale), _) = Locale::strip_path_prefix(path) {
      return locale;
    }
    if let Some(header) = accept_language {
      for entry in header.split(',') {
        let tag = entry.split(';').next().unwrap_or("").trim();
        if let Some(locale) = Locale::from_tag(tag) {
          return locale;
        }
      }
    }
    Locale::default()
  }

  // --- User-facing messages ---

  pub fn auth_required(self) -> &'static str {
    match self {
      Locale::Tr => "Oturum açmanız gerekiyor",
      Locale::En => "You must be signed in",
    }
  }

  pub fn invalid_credentials(self) -> &'static str {
    match self {
      Locale::Tr => "E-posta veya şifre hatalı",
      Locale::En => "Invalid email or password",
    }
  }

  pub fn email_taken(self) -> &'static str {
    match self {
      Locale::Tr => "Bu e-posta adresi zaten kayıtlı",
      Locale::En => "This email address is already registered",
    }
  }

  pub fn cart_empty(self) -> &'static str {
    match self {
      Locale::Tr => "Sepetiniz boş",
      Locale::En => "Your cart is empty",
    }
  }

  pub fn insufficient_stock(self) -> &'static str {
    match self {
      Locale::Tr => "Yetersiz stok",
      Locale::En => "Insufficient stock",
    }
  }
}

impl FromRequest for Locale {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let accept_language = req
      .headers()
      .get(actix_web::http::header::ACCEPT_LANGUAGE)
      .and_then(|v| v.to_str().ok());
    ready(Ok(Locale::negotiate(req.path(), accept_language)))
  }
}
