//! User-facing message catalog (Arabic / English).

pub const ROLE_FORBIDDEN_EN: &str = "You are not authorized to access this page.";
pub const ROLE_FORBIDDEN_AR: &str = "غير مصرح لك بالوصول إلى هذه الصفحة.";

pub const PARENT_VIEW_ONLY_EN: &str = "Parent accounts are view-only.";
pub const PARENT_VIEW_ONLY_AR: &str = "حسابات أولياء الأمور للعرض فقط.";

pub const ACCESS_DENIED_EN: &str = "You do not have an active subscription for this content.";
pub const ACCESS_DENIED_AR: &str = "لا يوجد لديك اشتراك نشط لهذا المحتوى.";

pub const MOBILE_PAYMENT_BLOCKED_EN: &str =
    "Payments are only available on the web version of the platform.";
pub const MOBILE_PAYMENT_BLOCKED_AR: &str =
    "المدفوعات متاحة فقط من خلال النسخة الإلكترونية من المنصة.";

pub const PRIVATE_CHAT_BLOCKED_EN: &str = "Private chat with this user is not allowed.";
pub const PRIVATE_CHAT_BLOCKED_AR: &str = "المحادثة الخاصة مع هذا المستخدم غير متاحة.";

/// Pick the message for a locale. Anything other than Arabic falls back to
/// English.
pub fn localize<'a>(locale: &str, en: &'a str, ar: &'a str) -> &'a str {
    if locale == "ar" {
        ar
    } else {
        en
    }
}
