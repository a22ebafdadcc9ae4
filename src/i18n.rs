//! Text lookup for the pages.
//!
//! English is the complete table; other languages cover what has been
//! translated so far and fall back to English, then to the key itself.

use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::persistence::{PreferenceStorage, LANGUAGE_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::French];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::French => "Français",
        }
    }

    /// Short regional tag shown next to the name.
    pub fn flag(self) -> &'static str {
        match self {
            Language::English => "US",
            Language::Spanish => "ES",
            Language::French => "FR",
        }
    }

    pub fn from_code(code: &str) -> Result<Language> {
        let code = code.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or(Error::UnknownLanguage(code))
    }
}

lazy_static! {
    static ref TRANSLATIONS: HashMap<Language, HashMap<&'static str, &'static str>> = {
        let mut map = HashMap::new();
        map.insert(Language::English, HashMap::from([
            // Navigation
            ("profile", "Profile"),
            ("projects", "Projects"),
            ("mysteryProject", "Mystery Project"),
            ("contact", "Contact"),
            ("settings", "Settings"),
            ("alwaysLearning", "Always learning, always building"),
            // Profile
            ("welcomeHey", "Hey there!"),
            ("welcomeTitle", "Welcome"),
            ("welcomeTo", "to the portfolio of"),
            ("welcomeName", "Sahil Shrivastav"),
            ("profileSubtitle", "Software engineer and data analyst who enjoys turning messy data into useful products."),
            ("aboutMe", "About Me"),
            ("aboutMeText", "I build web applications and data pipelines, and I like understanding a system end to end: from the database schema to the pixels on screen."),
            ("technicalSkills", "Technical Skills"),
            ("myMindset", "My Mindset"),
            ("projectDriven", "Project Driven"),
            ("projectDrivenText", "I learn best by shipping something real."),
            ("innovationFocused", "Innovation Focused"),
            ("innovationFocusedText", "Looking for the simpler, sharper way to solve a problem."),
            ("alwaysLearningText", "Every project teaches a new tool, pattern or trade-off."),
            // Projects
            ("projectsTitle", "My Projects"),
            ("projectsSubtitle", "A selection of things I have built"),
            ("ecommerceTitle", "E-Commerce Platform"),
            ("ecommerceDesc", "Full-stack store with cart, checkout and payment integration."),
            ("analyticsTitle", "Analytics Dashboard"),
            ("analyticsDesc", "Interactive charts over business metrics with drill-down filters."),
            ("taskTitle", "Task Manager"),
            ("taskDesc", "Real-time collaborative task board with live updates."),
            ("weatherTitle", "Weather App"),
            ("weatherDesc", "Forecasts and current conditions from a public weather API."),
            ("mlTitle", "ML Prediction Model"),
            ("mlDesc", "Trained classifier served behind a small web API."),
            ("socialTitle", "Social Media Clone"),
            ("socialDesc", "Posts, follows and real-time notifications."),
            ("liveDemo", "Live Demo"),
            ("repository", "Repository"),
            // Mystery project
            ("mysteryProjectTitle", "Mystery Project"),
            ("mysteryProjectSubtitle", "A status report on what I am building right now"),
            ("projectAim", "Project Aim"),
            ("projectAimDescription", "An AI-assisted coding companion that lives inside the editor."),
            ("realtimeAnalysis", "Real-time code analysis"),
            ("contextAwareCompletion", "Context-aware completion"),
            ("bugDetection", "Bug detection"),
            ("codeOptimization", "Code optimization hints"),
            ("multiLanguageSupport", "Multi-language support"),
            ("currentDrawbacks", "Current Drawbacks"),
            ("highComputationalReq", "High computational requirements"),
            ("accuracyVaries", "Accuracy varies between languages"),
            ("contextLimited", "Limited context window"),
            ("integrationChallenges", "Editor integration challenges"),
            ("technicalLimitations", "Technical Limitations"),
            ("modelSizeConstraints", "Model size constraints"),
            ("limitedTrainingData", "Limited training data"),
            ("complexArchitecture", "Complex architecture"),
            ("performanceBottlenecks", "Performance bottlenecks"),
            ("crossPlatformIssues", "Cross-platform issues"),
            ("currentIssues", "Current Issues"),
            ("memoryLeaks", "Memory leaks in long sessions"),
            ("inconsistentSuggestions", "Inconsistent suggestions"),
            ("extensionCrashes", "Occasional extension crashes"),
            ("slowResponseTimes", "Slow response times"),
            ("developmentPhase", "Development Phase"),
            ("phaseText", "Beta testing"),
            ("phaseDescription", "Core features are in place; stability and speed come next."),
            ("phaseResearchPlanning", "Research & planning"),
            ("phaseCoreDevlopment", "Core development"),
            ("phaseBetaTesting", "Beta testing"),
            ("phaseProductionRelease", "Production release"),
            ("phaseFeatureEnhancement", "Feature enhancement"),
            // Contact
            ("contactTitle", "Get In Touch"),
            ("contactSubtitle", "Have a project in mind or just want to say hi?"),
            ("emailMe", "Email Me"),
            ("emailMeDesc", "sahil25shrivastav@gmail.com"),
            ("fullName", "Full Name"),
            ("emailAddress", "Email Address"),
            ("subject", "Subject"),
            ("messageLabel", "Message"),
            ("sendMessage", "Send Message"),
            ("sending", "Sending..."),
            ("messageSentSuccess", "Thanks! Your message has been sent."),
            // Settings
            ("settingsTitle", "Settings"),
            ("settingsSubtitle", "Make the portfolio yours"),
            ("themeSettings", "Theme"),
            ("autoChange", "Auto"),
            ("autoChangeDesc", "Cycle through every theme"),
            ("blueTheme", "Blue"),
            ("blueThemeDesc", "Calm indigo and violet"),
            ("redTheme", "Red"),
            ("redThemeDesc", "Warm coral and magenta"),
            ("greyTheme", "Grey"),
            ("greyThemeDesc", "Quiet slate tones"),
            ("languageSettings", "Language"),
            ("bugReport", "Report a Bug"),
            ("bugReportDesc", "Found something broken? Describe it below."),
            ("bugDetails", "Bug Details"),
            ("submitBugReport", "Submit Bug Report"),
            ("bugReportSuccess", "Thanks! Your bug report has been submitted."),
        ]));
        map.insert(Language::Spanish, HashMap::from([
            ("profile", "Perfil"),
            ("projects", "Proyectos"),
            ("mysteryProject", "Proyecto Misterioso"),
            ("contact", "Contacto"),
            ("settings", "Ajustes"),
            ("alwaysLearning", "Siempre aprendiendo, siempre construyendo"),
            ("welcomeHey", "¡Hola!"),
            ("welcomeTitle", "Bienvenido"),
            ("welcomeTo", "al portafolio de"),
            ("aboutMe", "Sobre mí"),
            ("technicalSkills", "Habilidades técnicas"),
            ("projectsTitle", "Mis proyectos"),
            ("mysteryProjectTitle", "Proyecto Misterioso"),
            ("contactTitle", "Ponte en contacto"),
            ("sendMessage", "Enviar mensaje"),
            ("sending", "Enviando..."),
            ("settingsTitle", "Ajustes"),
            ("themeSettings", "Tema"),
            ("autoChange", "Automático"),
            ("autoChangeDesc", "Recorre todos los temas"),
            ("blueTheme", "Azul"),
            ("redTheme", "Rojo"),
            ("greyTheme", "Gris"),
            ("languageSettings", "Idioma"),
            ("bugReport", "Reportar un error"),
            ("submitBugReport", "Enviar reporte"),
        ]));
        map.insert(Language::French, HashMap::from([
            ("profile", "Profil"),
            ("projects", "Projets"),
            ("mysteryProject", "Projet Mystère"),
            ("contact", "Contact"),
            ("settings", "Paramètres"),
            ("alwaysLearning", "Toujours apprendre, toujours construire"),
            ("welcomeHey", "Salut !"),
            ("welcomeTitle", "Bienvenue"),
            ("welcomeTo", "sur le portfolio de"),
            ("aboutMe", "À propos"),
            ("projectsTitle", "Mes projets"),
            ("mysteryProjectTitle", "Projet Mystère"),
            ("contactTitle", "Me contacter"),
            ("sendMessage", "Envoyer"),
            ("sending", "Envoi..."),
            ("settingsTitle", "Paramètres"),
            ("themeSettings", "Thème"),
            ("autoChange", "Automatique"),
            ("blueTheme", "Bleu"),
            ("redTheme", "Rouge"),
            ("greyTheme", "Gris"),
            ("languageSettings", "Langue"),
            ("bugReport", "Signaler un bug"),
        ]));
        map
    };
}

/// Look `key` up in `language`, falling back to English and then to the key.
pub fn translate(language: Language, key: &str) -> String {
    TRANSLATIONS
        .get(&language)
        .and_then(|table| table.get(key))
        .or_else(|| TRANSLATIONS.get(&Language::English).and_then(|table| table.get(key)))
        .map(|text| text.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// The active language plus where to persist it.
pub struct Translator {
    language: Language,
    storage: Box<dyn PreferenceStorage>,
}

impl Translator {
    /// Restore the persisted language; unknown or missing codes mean English.
    pub fn load(storage: Box<dyn PreferenceStorage>) -> Self {
        let language = match storage.get(LANGUAGE_KEY) {
            Some(code) => Language::from_code(&code).unwrap_or_else(|e| {
                debug!("{}, using English", e);
                Language::English
            }),
            None => Language::English,
        };
        Self { language, storage }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = self.storage.set(LANGUAGE_KEY, language.code()) {
            warn!("Failed to persist language {}: {}", language.code(), e);
        }
    }

    pub fn t(&self, key: &str) -> String {
        translate(self.language, key)
    }
}
