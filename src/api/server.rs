// ============================================================================
// API Client : Serveur de paiement
// ============================================================================
// Récupère l'historique des transactions depuis l'API REST du serveur
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : gestion d'erreurs avec contexte
// 3. Serde : désérialisation JSON automatique de l'enveloppe serveur
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::TransactionSource;
use crate::models::ServerTransaction;

/// URL par défaut du serveur (surchargée par LAZYHISTORY_SERVER)
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Variable d'environnement pour surcharger l'URL du serveur
const BASE_URL_ENV: &str = "LAZYHISTORY_SERVER";

// ============================================================================
// Structures pour parser la réponse JSON du serveur
// ============================================================================
// Le serveur enveloppe toutes ses réponses dans un objet
// { successful, message, transactionHistory }, on définit des structures
// qui matchent exactement cette enveloppe pour que serde puisse
// désérialiser automatiquement
// ============================================================================

/// Enveloppe de réponse du serveur
///
/// CONCEPT RUST : #[serde(rename_all = "camelCase")]
/// - "transactionHistory" (JSON) -> "transaction_history" (Rust)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    successful: bool,
    message: Option<String>,
    transaction_history: Option<Vec<ServerTransaction>>,
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client HTTP du serveur de paiement
///
/// CONCEPT RUST : Struct avec état partagé
/// - reqwest::Client gère un pool de connexions, on le construit une
///   seule fois et on le réutilise pour chaque requête
pub struct ServerApi {
    client: reqwest::Client,
    base_url: String,
}

impl ServerApi {
    /// Crée un client pour l'URL de base donnée
    ///
    /// CONCEPT RUST : Builder pattern
    /// - Client::builder() permet de configurer le client avant build()
    /// - User-Agent explicite pour identifier le client côté serveur
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lazyhistory/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Crée un client depuis l'environnement
    ///
    /// CONCEPT : Configuration par variable d'environnement
    /// - LAZYHISTORY_SERVER=http://serveur:8080 pour pointer ailleurs
    /// - Même approche que RUST_LOG pour le filtre de logs
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        info!(base_url = %base_url, "Configured payment server base URL");
        Self::new(base_url)
    }

    /// Retourne l'URL de base configurée
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TransactionSource for ServerApi {
    /// Récupère l'historique des transactions du serveur
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Macro tracing qui ajoute automatiquement un span
    /// - Tous les logs à l'intérieur auront le contexte de la requête
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_history(&self) -> Result<Vec<ServerTransaction>> {
        let url = build_history_url(&self.base_url);
        debug!(url = %url, "Built history URL");

        debug!("Sending HTTP request to payment server");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers le serveur de paiement")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Payment server returned error status");
            anyhow::bail!("Le serveur a retourné une erreur : HTTP {}", status);
        }

        // Parse la réponse JSON
        // CONCEPT RUST : Serde deserialization
        // - .json::<T>() désérialise automatiquement le JSON vers le type T
        debug!("Parsing JSON response");
        let envelope: HistoryResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse du serveur")?;

        let history = parse_history_response(envelope)?;
        info!(transactions = history.len(), "Successfully fetched transaction history");
        Ok(history)
    }
}

/// Construit l'URL de l'endpoint d'historique
///
/// CONCEPT RUST : &str vs String
/// - Fonction prend &str (référence, pas d'allocation)
/// - Retourne String (owned, allouée)
fn build_history_url(base_url: &str) -> String {
    format!("{}/transaction/history", base_url.trim_end_matches('/'))
}

/// Extrait la liste de transactions de l'enveloppe serveur
///
/// Une enveloppe avec successful == false est traitée comme un échec de
/// fetch portant le message du serveur. L'ordre des transactions est
/// celui du serveur, sans tri ni filtrage.
fn parse_history_response(envelope: HistoryResponse) -> Result<Vec<ServerTransaction>> {
    if !envelope.successful {
        let message = envelope
            .message
            .unwrap_or_else(|| "raison inconnue".to_string());
        error!(message = %message, "Payment server rejected the history request");
        anyhow::bail!("Le serveur a refusé la requête : {}", message);
    }

    // CONCEPT RUST : Option unwrap et default
    // - Un historique absent équivaut à un historique vide
    Ok(envelope.transaction_history.unwrap_or_default())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_history_url() {
        let url = build_history_url("http://localhost:8080");
        assert_eq!(url, "http://localhost:8080/transaction/history");

        // Le slash final de la base est toléré
        let url = build_history_url("http://localhost:8080/");
        assert_eq!(url, "http://localhost:8080/transaction/history");
    }

    #[test]
    fn test_parse_successful_envelope() {
        let json = r#"{
            "successful": true,
            "message": null,
            "transactionHistory": [
                {
                    "id": 1,
                    "timestamp": "2024-05-12T14:03:00Z",
                    "amount": 0.05,
                    "payer": "alice",
                    "payee": "bob",
                    "verified": true
                },
                {
                    "id": 2,
                    "timestamp": "2024-05-12T15:10:00Z",
                    "amount": 0.10,
                    "payer": "bob",
                    "payee": "carol",
                    "verified": false
                }
            ]
        }"#;

        let envelope: HistoryResponse = serde_json::from_str(json).unwrap();
        let history = parse_history_response(envelope).unwrap();

        // L'ordre du serveur est préservé
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[1].id, 2);
        assert_eq!(history[1].payee, "carol");
    }

    #[test]
    fn test_parse_empty_history() {
        // Historique absent == historique vide
        let json = r#"{ "successful": true, "message": null }"#;
        let envelope: HistoryResponse = serde_json::from_str(json).unwrap();

        let history = parse_history_response(envelope).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_parse_rejected_envelope() {
        let json = r#"{ "successful": false, "message": "not authorized" }"#;
        let envelope: HistoryResponse = serde_json::from_str(json).unwrap();

        let err = parse_history_response(envelope).unwrap_err();
        assert!(err.to_string().contains("not authorized"));
    }

    #[test]
    fn test_server_api_from_base_url() {
        let api = ServerApi::new("http://localhost:8080").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
    }
}
