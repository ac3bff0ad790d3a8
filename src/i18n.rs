// ==========================================
// Internationalization (i18n)
// ==========================================
// rust-i18n, locales/: pt-BR (default) and en
// The rust_i18n::i18n! macro is initialized in lib.rs
// ==========================================

/// Current locale
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale ("pt-BR" or "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a key
///
/// # Example
/// ```no_run
/// use parking_occupancy::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a key, replacing `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use parking_occupancy::i18n::t_with_args;
/// let msg = t_with_args("not_found.vehicle", &[("id", "v-42")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale is process-global and tests run in parallel
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("pt-BR");
        assert_eq!(current_locale(), "pt-BR");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("pt-BR");
        assert_eq!(t("common.success"), "Operação realizada com sucesso");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("pt-BR");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("pt-BR");
        let msg = t_with_args("validation.duplicate_plate", &[("plate", "ABC1D23")]);
        assert!(msg.contains("ABC1D23"));
        assert!(msg.contains("placa"));

        set_locale("en");
        let msg = t_with_args("validation.duplicate_plate", &[("plate", "ABC1D23")]);
        assert!(msg.contains("plate ABC1D23"));

        set_locale("pt-BR");
    }
}
