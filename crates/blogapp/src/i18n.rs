//! Built-in message catalogue.
//!
//! Every user-facing notification is addressed by a [`MessageKey`] and looked up
//! in the active [`Language`]. Turkish is the default, matching the web client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Tr, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::Tr => "Türkçe",
            Language::En => "English",
        }
    }

    /// Month name, 1-based.
    pub fn month_name(self, month: u32) -> &'static str {
        const TR: [&str; 12] = [
            "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül",
            "Ekim", "Kasım", "Aralık",
        ];
        const EN: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Language::Tr => TR[idx],
            Language::En => EN[idx],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts bare codes and region-qualified tags (`en-US`, `tr_TR`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "tr" => Ok(Language::Tr),
            "en" => Ok(Language::En),
            _ => Err(format!("unsupported language '{}' (expected tr or en)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    LoginSuccess,
    LoginFailed,
    RegisterSuccess,
    RegisterFailed,
    LogoutSuccess,
    ServerUnreachable,
    Unexpected,
    PostsLoadError,
    PostNotFound,
    PostCreated,
    PostCreateFailed,
    PostUpdated,
    PostUpdateFailed,
    PostDeleted,
    PostDeleteFailed,
    UserPostsLoadError,
    TagsLoadError,
    UsersLoadError,
    TagCreated,
    TagCreateFailed,
    TagUpdated,
    TagUpdateFailed,
    TagDeleted,
    TagDeleteFailed,
    TagNameEmpty,
    TagNameTooLong,
    TitleRequired,
    TitleTooShort,
    ContentRequired,
    ContentTooShort,
    UsernameLength,
    EmailInvalid,
    PasswordLength,
    ProfileLoadError,
    ProfileUpdated,
    ProfileUpdateFailed,
    DarkModeOn,
    DarkModeOff,
    LanguageChanged,
}

impl MessageKey {
    pub fn text(self, language: Language) -> &'static str {
        let (tr, en) = self.pair();
        match language {
            Language::Tr => tr,
            Language::En => en,
        }
    }

    fn pair(self) -> (&'static str, &'static str) {
        use MessageKey::*;
        match self {
            LoginSuccess => ("Başarıyla giriş yapıldı!", "Logged in successfully!"),
            LoginFailed => ("Giriş yapılırken hata oluştu", "Could not log in"),
            RegisterSuccess => (
                "Kayıt başarılı! Şimdi giriş yapabilirsiniz.",
                "Registration successful! You can log in now.",
            ),
            RegisterFailed => ("Kayıt olurken hata oluştu", "Could not register"),
            LogoutSuccess => ("Başarıyla çıkış yapıldı!", "Logged out successfully!"),
            ServerUnreachable => ("Sunucuya ulaşılamıyor", "Cannot reach the server"),
            Unexpected => ("Beklenmeyen bir hata oluştu", "An unexpected error occurred"),
            PostsLoadError => (
                "Blog yazıları yüklenirken hata oluştu",
                "Could not load blog posts",
            ),
            PostNotFound => ("Blog yazısı bulunamadı", "Blog post not found"),
            PostCreated => (
                "Blog yazısı başarıyla oluşturuldu!",
                "Blog post created successfully!",
            ),
            PostCreateFailed => (
                "Blog yazısı oluşturulurken hata oluştu",
                "Could not create the blog post",
            ),
            PostUpdated => (
                "Blog yazısı başarıyla güncellendi!",
                "Blog post updated successfully!",
            ),
            PostUpdateFailed => (
                "Blog yazısı güncellenirken hata oluştu",
                "Could not update the blog post",
            ),
            PostDeleted => (
                "Blog yazısı başarıyla silindi!",
                "Blog post deleted successfully!",
            ),
            PostDeleteFailed => (
                "Blog yazısı silinirken hata oluştu",
                "Could not delete the blog post",
            ),
            UserPostsLoadError => (
                "Yazılarınız yüklenirken hata oluştu",
                "Could not load your posts",
            ),
            TagsLoadError => ("Etiketler yüklenirken hata oluştu", "Could not load tags"),
            UsersLoadError => (
                "Kullanıcılar yüklenirken hata oluştu",
                "Could not load users",
            ),
            TagCreated => ("Etiket oluşturuldu!", "Tag created!"),
            TagCreateFailed => (
                "Etiket oluşturulurken hata oluştu",
                "Could not create the tag",
            ),
            TagUpdated => ("Etiket güncellendi!", "Tag updated!"),
            TagUpdateFailed => (
                "Etiket güncellenirken hata oluştu",
                "Could not update the tag",
            ),
            TagDeleted => ("Etiket silindi!", "Tag deleted!"),
            TagDeleteFailed => ("Etiket silinirken hata oluştu", "Could not delete the tag"),
            TagNameEmpty => ("Etiket adı boş olamaz", "Tag name cannot be empty"),
            TagNameTooLong => (
                "Etiket adı 50 karakterden uzun olamaz",
                "Tag name cannot be longer than 50 characters",
            ),
            TitleRequired => ("Başlık gereklidir", "Title is required"),
            TitleTooShort => (
                "Başlık en az 5 karakter olmalıdır",
                "Title must be at least 5 characters",
            ),
            ContentRequired => ("İçerik gereklidir", "Content is required"),
            ContentTooShort => (
                "İçerik en az 50 karakter olmalıdır",
                "Content must be at least 50 characters",
            ),
            UsernameLength => (
                "Kullanıcı adı 3 ile 32 karakter arasında olmalıdır",
                "Username must be between 3 and 32 characters",
            ),
            EmailInvalid => (
                "Geçerli bir e-posta adresi giriniz",
                "Please enter a valid e-mail address",
            ),
            PasswordLength => (
                "Şifre 6 ile 128 karakter arasında olmalıdır",
                "Password must be between 6 and 128 characters",
            ),
            ProfileLoadError => ("Profil yüklenirken hata oluştu", "Could not load the profile"),
            ProfileUpdated => ("Profil güncellendi!", "Profile updated!"),
            ProfileUpdateFailed => (
                "Profil güncellenirken hata oluştu",
                "Could not update the profile",
            ),
            DarkModeOn => ("Karanlık mod açık", "Dark mode on"),
            DarkModeOff => ("Karanlık mod kapalı", "Dark mode off"),
            LanguageChanged => ("Dil değiştirildi: Türkçe", "Language changed: English"),
        }
    }
}
