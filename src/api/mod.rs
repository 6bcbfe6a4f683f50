// ============================================================================
// Module : api
// ============================================================================
// Accès aux données de transactions du serveur de paiement
//
// CONCEPT RUST : Trait comme seam d'injection
// - Le contrôleur dépend du trait TransactionSource, pas du client HTTP
// - En production : ServerApi (reqwest), en test : un stub en mémoire
// - Remplace le container d'injection de dépendances par un paramètre
//   explicite de constructeur
// ============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ServerTransaction;

pub mod server; // Client HTTP du serveur de paiement

pub use server::ServerApi;

/// Capacité d'accès à l'historique des transactions du serveur
///
/// CONCEPT RUST : #[async_trait]
/// - Les méthodes async dans les traits nécessitent la macro async_trait
/// - Send + Sync : l'implémentation doit pouvoir traverser les threads
///   (le worker thread possède la source)
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Récupère l'historique complet, dans l'ordre fourni par le serveur
    ///
    /// Zéro ou plusieurs transactions ; l'ordre n'est ni trié ni filtré
    /// de ce côté-ci.
    async fn get_history(&self) -> Result<Vec<ServerTransaction>>;
}
