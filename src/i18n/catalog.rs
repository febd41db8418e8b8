use crate::assets::{image::SelectionRejected, message::LengthAlert};

/// Locales with a bundled catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parse a locale code (`"fr"`, `"fr-FR"`, `"FR"`). Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "fr" => Self::Fr,
            _ => Self::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

#[derive(Debug)]
pub struct NavigationText {
    pub en: &'static str,
    pub fr: &'static str,
}

#[derive(Debug)]
pub struct HomeText {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub start: &'static str,
    /// Shown once the document has been delivered.
    pub toast: &'static str,
}

#[derive(Debug)]
pub struct ImageFormText {
    pub title: &'static str,
    pub label: &'static str,
    pub too_many_files: &'static str,
    pub unreadable_file: &'static str,
    pub unsupported_file: &'static str,
}

#[derive(Debug)]
pub struct TextAreaText {
    pub label: &'static str,
    pub placeholder: &'static str,
    /// Suffix after the remaining-character count.
    pub characters: &'static str,
    pub allowed: &'static str,
    pub too_long: &'static str,
}

#[derive(Debug)]
pub struct PreviewText {
    pub title: &'static str,
    pub opt_one: &'static str,
    pub opt_two: &'static str,
    pub button: &'static str,
    pub show: &'static str,
    pub hide: &'static str,
}

#[derive(Debug)]
pub struct BusyText {
    pub loading: &'static str,
    pub transforming: &'static str,
    pub generating: &'static str,
}

#[derive(Debug)]
pub struct ConfirmationText {
    pub title: &'static str,
    pub paragraph: &'static str,
    pub again: &'static str,
    pub visit: &'static str,
}

/// Every user-facing string for one locale.
#[derive(Debug)]
pub struct Catalog {
    pub locale: Locale,
    pub navigation: NavigationText,
    pub home: HomeText,
    pub image_form: ImageFormText,
    pub textarea: TextAreaText,
    pub preview: PreviewText,
    pub busy: BusyText,
    pub confirmation: ConfirmationText,
    error_prefix: &'static str,
}

pub static EN: Catalog = Catalog {
    locale: Locale::En,
    navigation: NavigationText {
        en: "English",
        fr: "French",
    },
    home: HomeText {
        title: "Create your plaque",
        subtitle: "Add a photo and a short message, we turn it into a printable PDF.",
        start: "Get started",
        toast: "Your PDF is ready!",
    },
    image_form: ImageFormText {
        title: "Your photo",
        label: "Select an image",
        too_many_files: "Please select only one image.",
        unreadable_file: "The image could not be read. Please try another file.",
        unsupported_file: "Only .jpg, .jpeg and .png images are accepted.",
    },
    textarea: TextAreaText {
        label: "Your message",
        placeholder: "Write your message here",
        characters: "characters left",
        allowed: "Character limit reached",
        too_long: "Message cannot exceed 25 characters.",
    },
    preview: PreviewText {
        title: "Choose a layout",
        opt_one: "Option 1",
        opt_two: "Option 2",
        button: "Generate PDF",
        show: "Show preview",
        hide: "Hide preview",
    },
    busy: BusyText {
        loading: "Loading...",
        transforming: "Transforming image...",
        generating: "Generating PDF...",
    },
    confirmation: ConfirmationText {
        title: "Thank you!",
        paragraph: "Your PDF has been downloaded.",
        again: "Create another one",
        visit: "Visit our website",
    },
    error_prefix: "Error",
};

pub static FR: Catalog = Catalog {
    locale: Locale::Fr,
    navigation: NavigationText {
        en: "Anglais",
        fr: "Français",
    },
    home: HomeText {
        title: "Créez votre plaque",
        subtitle: "Ajoutez une photo et un court message, nous en faisons un PDF imprimable.",
        start: "Commencer",
        toast: "Votre PDF est prêt !",
    },
    image_form: ImageFormText {
        title: "Votre photo",
        label: "Choisir une image",
        too_many_files: "Veuillez sélectionner une seule image.",
        unreadable_file: "L'image n'a pas pu être lue. Essayez un autre fichier.",
        unsupported_file: "Seules les images .jpg, .jpeg et .png sont acceptées.",
    },
    textarea: TextAreaText {
        label: "Votre message",
        placeholder: "Écrivez votre message ici",
        characters: "caractères restants",
        allowed: "Limite de caractères atteinte",
        too_long: "Le message ne peut pas dépasser 25 caractères.",
    },
    preview: PreviewText {
        title: "Choisissez une mise en page",
        opt_one: "Option 1",
        opt_two: "Option 2",
        button: "Générer le PDF",
        show: "Afficher l'aperçu",
        hide: "Masquer l'aperçu",
    },
    busy: BusyText {
        loading: "Chargement...",
        transforming: "Transformation de l'image...",
        generating: "Génération du PDF...",
    },
    confirmation: ConfirmationText {
        title: "Merci !",
        paragraph: "Votre PDF a été téléchargé.",
        again: "En créer un autre",
        visit: "Visiter notre site",
    },
    error_prefix: "Erreur",
};

/// Catalog for `code`, English when the code is unknown.
pub fn catalog(code: &str) -> &'static Catalog {
    match Locale::from_code(code) {
        Locale::En => &EN,
        Locale::Fr => &FR,
    }
}

impl Catalog {
    /// `Error: <message>` in this locale.
    pub fn error_toast(&self, message: &str) -> String {
        format!("{}: {message}", self.error_prefix)
    }

    /// Warning shown for a rejected file selection.
    pub fn selection_message(&self, rejected: &SelectionRejected) -> &'static str {
        match rejected {
            SelectionRejected::MultipleFiles(_) => self.image_form.too_many_files,
            SelectionRejected::UnsupportedType(_) => self.image_form.unsupported_file,
            SelectionRejected::Unreadable(_) => self.image_form.unreadable_file,
        }
    }

    /// Counter text under the message input.
    pub fn length_hint(&self, remaining: usize, alert: Option<LengthAlert>) -> String {
        match alert {
            Some(LengthAlert::LimitReached) => self.textarea.allowed.to_string(),
            _ => format!("{remaining} {}", self.textarea.characters),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/i18n/catalog.rs"]
mod tests;
