/// All language codes supported by Google Cloud Translate NMT
const GOOGLE_TRANSLATE_LANG_CODES: [&str; 198] = [
    "ab", "ace", "ach", "af", "sq", "alz", "am", "ar", "hy", "as", "awa", "ay", "az", "ban", "bm",
    "ba", "eu", "btx", "bts", "bbc", "be", "bem", "bn", "bew", "bho", "bik", "bs", "br", "bg",
    "bua", "yue", "ca", "ceb", "ny", "zh-CN", "zh", "zh-TW", "cv", "co", "crh", "hr", "cs", "da",
    "din", "dv", "doi", "dov", "nl", "dz", "en", "eo", "et", "ee", "fj", "fil", "tl", "fi", "fr",
    "fr-FR", "fr-CA", "fy", "ff", "gaa", "gl", "lg", "ka", "de", "el", "gn", "gu", "ht", "cnh",
    "ha", "haw", "iw", "he", "hil", "hi", "hmn", "hu", "hrx", "is", "ig", "ilo", "id", "ga", "it",
    "ja", "jw", "jv", "kn", "pam", "kk", "km", "cgg", "rw", "ktu", "gom", "ko", "kri", "ku", "ckb",
    "ky", "lo", "ltg", "la", "lv", "lij", "li", "ln", "lt", "lmo", "luo", "lb", "mk", "mai", "mak",
    "mg", "ms", "ms-Arab", "ml", "mt", "mi", "mr", "chm", "mni-Mtei", "min", "lus", "mn", "my",
    "nr", "new", "ne", "nso", "no", "nus", "oc", "or", "om", "pag", "pap", "ps", "fa", "pl", "pt",
    "pt-PT", "pt-BR", "pa", "pa-Arab", "qu", "rom", "ro", "rn", "ru", "sm", "sg", "sa", "gd", "sr",
    "st", "crs", "shn", "sn", "scn", "szl", "sd", "si", "sk", "sl", "so", "es", "su", "sw", "ss",
    "sv", "tg", "ta", "tt", "te", "tet", "th", "ti", "ts", "tn", "tr", "tk", "ak", "uk", "ur", "ug",
    "uz", "vi", "cy", "xh", "yi", "yo", "yua", "zu",
];

/// All language codes supported by Libretranslate
const LIBRE_TRANSLATE_LANG_CODES: [&str; 49] = [
    "en", "sq", "ar", "az", "eu", "bn", "bg", "ca", "zh-Hans", "zh-Hant", "cs", "da", "nl", "eo",
    "et", "fi", "fr", "gl", "de", "el", "he", "hi", "hu", "id", "ga", "it", "ja", "ko", "ky", "lv",
    "lt", "ms", "nb", "fa", "pl", "pt", "pt-BR", "ro", "ru", "sk", "sl", "es", "sv", "tl", "th",
    "tr", "uk", "ur", "vi",
];

use thiserror::Error;

use crate::config::TranslationProvider;

/// A target language the provider cannot translate into
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageNormalizeError {
    /// No code of the provider shares the primary subtag
    #[error("the language `{0}` is not supported")]
    Unsupported(String),
}

/// Map `lang_code` onto a code the provider accepts.
///
/// `pt-BR` stays as is for google, `en-US` becomes `en`.
pub fn normalize_lang(
    provider: &TranslationProvider,
    lang_code: &str,
) -> Result<String, LanguageNormalizeError> {
    match provider {
        TranslationProvider::GOOGLE => normalize(lang_code, &GOOGLE_TRANSLATE_LANG_CODES),
        TranslationProvider::LIBRETRANSLATE => normalize(lang_code, &LIBRE_TRANSLATE_LANG_CODES),
    }
}

fn normalize(locale: &str, codes: &[&str]) -> Result<String, LanguageNormalizeError> {
    let locale = locale.trim().replace('_', "-");

    if let Some(code) = codes.iter().find(|c| c.eq_ignore_ascii_case(&locale)) {
        return Ok(code.to_string());
    }

    //zh-TW -> zh
    let primary = locale.split('-').next().unwrap_or_default();

    codes
        .iter()
        .find(|c| !primary.is_empty() && c.eq_ignore_ascii_case(primary))
        .or_else(|| {
            codes.iter().find(|c| {
                c.split('-')
                    .next()
                    .is_some_and(|p| !primary.is_empty() && p.eq_ignore_ascii_case(primary))
            })
        })
        .map(|c| c.to_string())
        .ok_or_else(|| LanguageNormalizeError::Unsupported(locale.clone()))
}

#[test]
fn test_normalize_lang() {
    let google = TranslationProvider::GOOGLE;
    let libre = TranslationProvider::LIBRETRANSLATE;

    assert_eq!(normalize_lang(&google, "en"), Ok("en".to_string()));
    assert_eq!(normalize_lang(&google, "es"), Ok("es".to_string()));
    assert_eq!(normalize_lang(&google, "es-MX"), Ok("es".to_string()));
    assert_eq!(normalize_lang(&libre, "es"), Ok("es".to_string()));
    assert_eq!(normalize_lang(&google, "EN-us"), Ok("en".to_string()));
    assert_eq!(normalize_lang(&google, "pt-br"), Ok("pt-BR".to_string()));
    assert_eq!(normalize_lang(&google, "zh_TW"), Ok("zh-TW".to_string()));
    assert_eq!(normalize_lang(&google, "ms-MY"), Ok("ms".to_string()));
    assert_eq!(normalize_lang(&libre, "zh"), Ok("zh-Hans".to_string()));
    assert_eq!(
        normalize_lang(&libre, "xx"),
        Err(LanguageNormalizeError::Unsupported("xx".to_string()))
    );
    assert!(normalize_lang(&google, "").is_err());
}
