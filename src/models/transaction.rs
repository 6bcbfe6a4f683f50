// ============================================================================
// Structure : ServerTransaction
// ============================================================================
// Représente une transaction historique du serveur de paiement
//
// CONCEPTS RUST :
// 1. #[derive(...)] : génère automatiquement l'implémentation de traits
//    - Debug : permet d'afficher la structure avec {:?}
//    - Clone : permet de dupliquer la valeur
//    - PartialEq : permet de comparer deux transactions avec ==
// 2. DateTime<Utc> : type de chrono pour les timestamps avec timezone UTC
// 3. Serde : la forme du record appartient au serveur, on se contente
//    de la désérialiser telle quelle (champ par champ, camelCase)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Une transaction historique telle que retournée par le serveur
///
/// CONCEPT RUST : #[serde(rename_all = "camelCase")]
/// - Le serveur parle camelCase (JSON), Rust parle snake_case
/// - Serde fait la conversion automatiquement pour tous les champs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTransaction {
    /// Identifiant de la transaction côté serveur
    pub id: u64,

    /// Date et heure de la transaction (UTC)
    pub timestamp: DateTime<Utc>,

    /// Montant en BTC
    pub amount: f64,

    /// Nom d'utilisateur du payeur
    pub payer: String,

    /// Nom d'utilisateur du bénéficiaire
    pub payee: String,

    /// Transaction vérifiée par le serveur ou non
    pub verified: bool,
}

impl ServerTransaction {
    /// Formatte la transaction pour l'affichage dans la liste
    ///
    /// Format : "2024-05-12 14:03  palomafischer → bob      0.05000000 BTC  ✓"
    ///
    /// CONCEPT RUST : String building
    /// - format! pour créer des strings formatées
    /// - Les colonnes sont alignées avec {:<n} / {:>n}
    ///
    /// Note : Les noms d'utilisateur sont tronqués à 14 caractères pour
    /// éviter le débordement de la ligne
    pub fn display(&self) -> String {
        let date_str = self.timestamp.format("%Y-%m-%d %H:%M").to_string();
        let mark = if self.verified { "✓" } else { "…" };

        format!(
            " {:<16} {:<14} → {:<14} {:>14.8} BTC  {}",
            date_str,
            truncate(&self.payer, 14),
            truncate(&self.payee, 14),
            self.amount,
            mark
        )
    }

    /// Vérifie si la transaction a été confirmée par le serveur
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

/// Tronque une string à `max` caractères avec une ellipse si nécessaire
///
/// CONCEPT RUST : chars() vs bytes
/// - .chars().count() compte les caractères Unicode, pas les octets
/// - Indispensable pour les noms d'utilisateur accentués
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max - 1).collect();
        format!("{}…", truncated)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ServerTransaction {
        ServerTransaction {
            id: 42,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 12, 14, 3, 0).unwrap(),
            amount: 0.05,
            payer: "palomafischer".to_string(),
            payee: "bob".to_string(),
            verified: true,
        }
    }

    #[test]
    fn test_display_contains_fields() {
        let tx = sample();
        let line = tx.display();

        assert!(line.contains("2024-05-12 14:03"));
        assert!(line.contains("palomafischer"));
        assert!(line.contains("bob"));
        assert!(line.contains("0.05000000 BTC"));
        assert!(line.contains("✓"));
    }

    #[test]
    fn test_display_unverified_mark() {
        let mut tx = sample();
        tx.verified = false;

        assert!(!tx.display().contains("✓"));
        assert!(!tx.is_verified());
    }

    #[test]
    fn test_truncate_long_names() {
        let mut tx = sample();
        tx.payer = "unnomdutilisateurbeaucouptroplong".to_string();

        // Le nom est tronqué avec une ellipse, la ligne reste alignée
        assert!(tx.display().contains("…"));
        assert!(!tx.display().contains("unnomdutilisateurbeaucouptroplong"));
    }

    #[test]
    fn test_deserialize_camel_case() {
        // Le serveur envoie du camelCase, serde le mappe vers snake_case
        let json = r#"{
            "id": 7,
            "timestamp": "2024-05-12T14:03:00Z",
            "amount": 1.25,
            "payer": "alice",
            "payee": "bob",
            "verified": false
        }"#;

        let tx: ServerTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.amount, 1.25);
        assert_eq!(tx.payer, "alice");
        assert!(!tx.verified);
    }
}
