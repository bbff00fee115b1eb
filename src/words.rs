/// Static game content: target words, memory pairs, quiz questions, sequence steps, word
/// links and the installation checklist.
/// Each list can be loaded from a file, and falls back to the built-in content when the
/// file is missing.
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::*;
use serde::de::DeserializeOwned;

use crate::{
    checklist::Step,
    memory::{Pair, PairId},
    quiz::Question,
    relword::Link,
    wordle::Wordle,
};

pub const TARGET_WORDS: &[&str] = &["INCLUSIF", "RESPONSABLE", "DURABLE"];

const PAIRS: &[(u32, &str, &str)] = &[
    (1, "PC trop lent", "Installer Linux léger"),
    (
        2,
        "Plus de mises à jour Windows",
        "Installer un SSD ou changer le disque",
    ),
    (3, "Logiciels trop chers", "Utiliser des alternatives libres"),
    (
        4,
        "Ordinateur chauffe beaucoup",
        "Installer Linux pour continuer à utiliser le PC en sécurité",
    ),
    (
        5,
        "Trop peu de stockage disponible",
        "Dépoussiérage + nettoyage interne",
    ),
    (
        6,
        "Connexion internet trop limitée",
        "Utiliser des outils légers + synchronisation locale (ex : Nextcloud local)",
    ),
];

const QUESTIONS: &[(&str, [&str; 4], usize)] = &[
    (
        "Quel est l’objectif principal de la démarche NIRD ?",
        [
            "Acheter du matériel informatique neuf pour tous",
            "Développer les compétences en programmation du grand public",
            "Rendre le numérique plus accessible, autonome et écologique",
            "Moderniser les salles informatiques des lieux publics.",
        ],
        2,
    ),
    (
        "Pourquoi reconditionner des ordinateurs au lieu d’en acheter des neufs ?",
        [
            "Car il y a une limite d'ordinateurs",
            "Pour apprendre l’électronique uniquement",
            "Pour réduire les déchets électroniques et les coûts",
            "42",
        ],
        2,
    ),
    (
        "Qu’est-ce qu’un logiciel libre ?",
        [
            "Un logiciel gratuit mais publicitaire",
            "Un logiciel dont le code est ouvert et modifiable par tous",
            "Un logiciel réservé aux experts en informatique",
            "Un logiciel uniquement disponible sur Linux",
        ],
        1,
    ),
    (
        "Quel est l’un des avantages d’utiliser GNU/Linux dans un établissement ?",
        [
            "Il rend automatiquement les ordinateurs 10 fois plus rapides",
            "Il empêche d’installer d’autres logiciels",
            "Il prolonge la durée de vie du matériel et ne nécessite pas d’abonnement",
            "Il fonctionne uniquement sur les ordinateurs récents",
        ],
        2,
    ),
    (
        "Que permet le reconditionnement d’un ordinateur ?",
        [
            "Le transformer en console de jeu",
            "Lui redonner de la valeur financière",
            "Lui offrir plusieurs années d’utilisation supplémentaire",
            "Le rendre compatible uniquement avec Windows",
        ],
        2,
    ),
    (
        "Quel problème la NIRD cherche-t-elle à combattre ?",
        [
            "Le piratage informatique",
            "L'erreur 404",
            "La fracture numérique",
            "Le manque de formation professionnelle",
        ],
        2,
    ),
    (
        "Quel acteur est indispensable pour faire vivre un projet NIRD ?",
        [
            "Les magasins de téléphonie",
            "Les développeurs privés",
            "Les équipes éducatives et les collectivités locales",
            "Les vendeurs de matériel neuf",
        ],
        2,
    ),
];

pub const STEPS: &[&str] = &[
    "Inspecter le PC",
    "Nettoyer",
    "Tester la RAM",
    "Remplacer le disque",
    "Mettre à jour le BIOS/firmware",
    "Réinstaller OS",
    "Tester & finaliser",
];

const LINKS: &[(&str, &str)] = &[
    ("Google", "Brave"),
    ("Chrome", "Firefox"),
    ("Google Drive", "Nextcloud"),
    ("Gmail", "ProtonMail"),
    ("WhatsApp", "Signal"),
    ("Office", "LibreOffice"),
    ("GitHub", "Gitea"),
    ("Maps", "OpenStreetMap"),
    ("Passwords Drive", "Bitwarden"),
    ("Windows", "Linux"),
    ("ChatGPT", "LLAMA"),
    ("Spotify", "Funkwhale"),
];

const INSTALL_STEPS: &[(&str, &str, &str)] = &[
    (
        "Télécharger l'ISO",
        "Télécharger l'image ISO de la distribution Linux souhaitée.",
        "wget https://example.com/linux.iso",
    ),
    (
        "Créer la clé USB bootable",
        "Flasher l'ISO sur une clé USB avec un outil comme Rufus ou balenaEtcher.",
        "balena-etcher linux.iso /dev/sdb",
    ),
    (
        "Démarrer sur la clé",
        "Redémarrer le PC et booter sur la clé USB via le menu de boot.",
        "F12 / F8 / ESC selon le fabricant",
    ),
    (
        "Lancer l'installation",
        "Choisir 'Install Linux' depuis le menu de démarrage.",
        "Start Installer",
    ),
    (
        "Installer Linux",
        "Choisir la langue, le clavier, le disque et lancer la copie des fichiers.",
        "Installation en cours...",
    ),
    (
        "Premier démarrage",
        "Retirer la clé USB, redémarrer et accéder au bureau Linux.",
        "reboot",
    ),
];

pub fn default_pairs() -> Vec<Pair> {
    PAIRS
        .iter()
        .map(|(id, word, def)| Pair {
            id: PairId(*id),
            word: word.to_string(),
            def: def.to_string(),
        })
        .collect()
}

pub fn default_questions() -> Vec<Question> {
    QUESTIONS
        .iter()
        .map(|(prompt, choices, answer)| Question {
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            answer: *answer,
        })
        .collect()
}

pub fn default_links() -> Vec<Link> {
    LINKS
        .iter()
        .map(|(app, alt)| Link {
            app: app.to_string(),
            alt: alt.to_string(),
        })
        .collect()
}

pub fn default_install_steps() -> Vec<Step> {
    INSTALL_STEPS
        .iter()
        .map(|(title, desc, hint)| Step {
            title: title.to_string(),
            desc: desc.to_string(),
            hint: hint.to_string(),
        })
        .collect()
}

/// `playable_targets` drops target words a Wordle round can't be played on, such as
/// `e-mail`. It fails if nothing playable is left.
pub fn playable_targets(words: Vec<String>) -> Result<Vec<String>> {
    let (playable, rejected): (Vec<_>, Vec<_>) =
        words.into_iter().partition(|w| Wordle::new(w).is_ok());
    for word in &rejected {
        warn!("Skipping target word {:?}: not a single alphabetic word", word);
    }
    if playable.is_empty() {
        bail!("no playable target words");
    }
    Ok(playable)
}

/// `parse_lines` splits `text` into one entry per line. It filters out empty lines and
/// lines that start with a '#'.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.starts_with('#'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `read_lines` reads a line-per-entry file. A missing file yields `None`.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Option<Vec<String>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;
    Ok(Some(parse_lines(&text)))
}

/// `read_json` reads a JSON document. A missing file yields `None`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("Error deserializing {}", path.display()))?;
    Ok(Some(value))
}

/// `lines_or` loads a line list from `path`, falling back to `default`.
pub fn lines_or(path: impl AsRef<Path>, default: &[&str]) -> Result<Vec<String>> {
    let path = path.as_ref();
    match read_lines(path)? {
        Some(lines) if !lines.is_empty() => Ok(lines),
        Some(_) => bail!("{} has no entries", path.display()),
        None => {
            info!("{} not found, using built-in list", path.display());
            Ok(default.iter().map(|s| s.to_string()).collect())
        }
    }
}

/// `json_or` loads a JSON list from `path`, falling back to `default()`.
pub fn json_or<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    default: impl FnOnce() -> Vec<T>,
) -> Result<Vec<T>> {
    let path = path.as_ref();
    match read_json::<Vec<T>>(path)? {
        Some(items) if !items.is_empty() => Ok(items),
        Some(_) => bail!("{} has no entries", path.display()),
        None => {
            info!("{} not found, using built-in list", path.display());
            Ok(default())
        }
    }
}

/// `parse_grid` parses a `ROWSxCOLS` grid shape such as `3x4`.
pub fn parse_grid(shape: &str) -> Result<(usize, usize)> {
    let (rows, cols) = shape
        .split_once(['x', 'X'])
        .with_context(|| format!("grid shape {:?} is not ROWSxCOLS", shape))?;
    let rows = rows
        .trim()
        .parse()
        .with_context(|| format!("bad row count in {:?}", shape))?;
    let cols = cols
        .trim()
        .parse()
        .with_context(|| format!("bad column count in {:?}", shape))?;
    Ok((rows, cols))
}
