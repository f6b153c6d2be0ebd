//! Category defaults.

/// Icon used when a category is created or edited without one.
pub const DEFAULT_CATEGORY_ICON: &str = "📚";

/// Resolve a submitted icon, falling back to [`DEFAULT_CATEGORY_ICON`].
pub fn resolve_icon(icon: Option<&str>) -> String {
    icon.map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_CATEGORY_ICON)
        .to_string()
}
