// ============================================================================
// Structure : HistoryController
// ============================================================================
// Contrôleur "load-and-bind" de l'historique des transactions serveur :
// initialise le view model, puis un chargement asynchrone unique remplace
// la liste vide par la collection récupérée
//
// CONCEPTS RUST :
// 1. Génériques avec trait bound : S: TransactionSource
//    - Le contrôleur dépend de la capacité, pas du client HTTP concret
//    - Les paramètres explicites du constructeur remplacent le container
//      d'injection de dépendances
// 2. Arc<Mutex<App>> : le view model est un store partagé ; le rendu le
//    lit à chaque frame, le contrôleur écrit dedans à la résolution
// 3. Pas d'erreur qui s'échappe : un fetch raté est loggé et laisse le
//    view model sur sa valeur par défaut (liste vide)
// ============================================================================

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::api::TransactionSource;
use crate::app::App;

/// Contrôleur de la vue historique
///
/// Construction synchrone : le view model reçoit ses valeurs par défaut
/// (history vide, edit_mode false, transactions vide). Le chargement
/// distant est déclenché ensuite, sans bloquer l'appelant — en
/// production le worker thread exécute `load_remote_data`.
pub struct HistoryController<S: TransactionSource> {
    /// View model lié (partagé avec le rendu)
    app: Arc<Mutex<App>>,

    /// Capacité d'accès à l'historique (injectée)
    source: S,
}

impl<S: TransactionSource> HistoryController<S> {
    /// Crée le contrôleur et initialise le view model
    ///
    /// Synchrone, sans valeur de retour côté view model : après l'appel,
    /// `history == {}`, `edit_mode == false`, `transactions == []`.
    pub fn new(app: Arc<Mutex<App>>, source: S) -> Self {
        {
            // CONCEPT : Lock scope minimisé
            // - Lock seulement le temps de poser les défauts
            let mut vm = app.lock().unwrap();
            vm.reset_history_view();
        }

        Self { app, source }
    }

    /// Charge l'historique distant et le lie au view model
    ///
    /// - Succès : remplace `transactions` en bloc, dans l'ordre fourni
    ///   par le collaborateur ; le rendu ré-affiche la liste à la frame
    ///   suivante.
    /// - Échec : loggé, le view model reste sur sa liste vide ; aucune
    ///   erreur ne sort de l'opération.
    ///
    /// Les appels répétés ne sont pas dédupliqués : chaque appel résout
    /// indépendamment et écrase `transactions` (overwrite-on-resolve).
    pub async fn load_remote_data(&self) {
        // CONCEPT RUST : Suspension point unique
        // - Le seul .await de l'opération ; l'assignation qui suit est
        //   strictement postérieure à la résolution du fetch
        match self.source.get_history().await {
            Ok(transactions) => {
                info!(
                    transactions = transactions.len(),
                    "History fetched, binding to view model"
                );
                let mut vm = self.app.lock().unwrap();
                vm.transactions = transactions;
            }
            Err(e) => {
                // Pas de surface d'erreur côté UI : log et défauts sûrs
                error!(error = ?e, "Failed to load transaction history");
            }
        }
    }

    /// Retourne une référence vers le view model lié
    pub fn app(&self) -> &Arc<Mutex<App>> {
        &self.app
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Les propriétés du contrôleur sont testées avec des stubs de
// TransactionSource : résolution après un tick d'ordonnancement, liste
// vide, échec, appels répétés.
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use crate::models::ServerTransaction;

    fn tx(id: u64, amount: f64) -> ServerTransaction {
        ServerTransaction {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 12, 14, 3, 0).unwrap(),
            amount,
            payer: "alice".to_string(),
            payee: "bob".to_string(),
            verified: true,
        }
    }

    /// Stub qui résout après un tick d'ordonnancement
    struct StubSource {
        transactions: Vec<ServerTransaction>,
    }

    #[async_trait]
    impl TransactionSource for StubSource {
        async fn get_history(&self) -> Result<Vec<ServerTransaction>> {
            // Un tick de l'ordonnanceur avant de résoudre
            tokio::task::yield_now().await;
            Ok(self.transactions.clone())
        }
    }

    /// Stub qui échoue toujours
    struct FailingSource;

    #[async_trait]
    impl TransactionSource for FailingSource {
        async fn get_history(&self) -> Result<Vec<ServerTransaction>> {
            tokio::task::yield_now().await;
            anyhow::bail!("le serveur est injoignable")
        }
    }

    /// Stub qui sert une réponse différente à chaque appel
    struct SequencedSource {
        responses: Mutex<VecDeque<Vec<ServerTransaction>>>,
    }

    #[async_trait]
    impl TransactionSource for SequencedSource {
        async fn get_history(&self) -> Result<Vec<ServerTransaction>> {
            tokio::task::yield_now().await;
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_defaults_after_construction() {
        let app = Arc::new(Mutex::new(App::new()));
        let controller = HistoryController::new(
            app.clone(),
            StubSource {
                transactions: vec![tx(1, 10.0), tx(2, 20.0)],
            },
        );

        // Avant la résolution du fetch : les défauts du view model
        {
            let vm = app.lock().unwrap();
            assert!(vm.history.is_empty());
            assert!(!vm.edit_mode);
            assert!(vm.transactions.is_empty());
        }

        // Après la résolution : la séquence récupérée, telle quelle
        controller.load_remote_data().await;
        let vm = app.lock().unwrap();
        assert_eq!(vm.transactions.len(), 2);
        assert_eq!(vm.transactions[0].id, 1);
        assert_eq!(vm.transactions[0].amount, 10.0);
        assert_eq!(vm.transactions[1].id, 2);
        assert_eq!(vm.transactions[1].amount, 20.0);
    }

    #[tokio::test]
    async fn test_construction_resets_stale_state() {
        // Un App réutilisé avec un état résiduel est réinitialisé
        let app = Arc::new(Mutex::new(App::new()));
        {
            let mut vm = app.lock().unwrap();
            vm.transactions = vec![tx(99, 1.0)];
            vm.history.insert("99".to_string(), "note".to_string());
        }

        let _controller =
            HistoryController::new(app.clone(), StubSource { transactions: vec![] });

        let vm = app.lock().unwrap();
        assert!(vm.transactions.is_empty());
        assert!(vm.history.is_empty());
        assert!(!vm.edit_mode);
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let app = Arc::new(Mutex::new(App::new()));
        let controller = HistoryController::new(
            app.clone(),
            StubSource {
                transactions: vec![tx(3, 0.3), tx(1, 0.1), tx(2, 0.2)],
            },
        );

        controller.load_remote_data().await;

        // L'ordre du collaborateur est préservé, pas de tri
        let vm = app.lock().unwrap();
        let ids: Vec<u64> = vm.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_resolution_still_binds() {
        let app = Arc::new(Mutex::new(App::new()));
        let controller =
            HistoryController::new(app.clone(), StubSource { transactions: vec![] });

        controller.load_remote_data().await;

        let vm = app.lock().unwrap();
        assert!(vm.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_safe_defaults() {
        let app = Arc::new(Mutex::new(App::new()));
        let controller = HistoryController::new(app.clone(), FailingSource);

        // Aucune erreur ne sort de l'opération
        controller.load_remote_data().await;

        let vm = app.lock().unwrap();
        assert!(vm.transactions.is_empty());
        assert!(vm.history.is_empty());
        assert!(!vm.edit_mode);
    }

    #[tokio::test]
    async fn test_edit_mode_never_mutated() {
        // Succès puis échec : edit_mode reste false dans les deux cas
        let app = Arc::new(Mutex::new(App::new()));

        let controller = HistoryController::new(
            app.clone(),
            StubSource {
                transactions: vec![tx(1, 10.0)],
            },
        );
        controller.load_remote_data().await;
        assert!(!app.lock().unwrap().edit_mode);

        let controller = HistoryController::new(app.clone(), FailingSource);
        controller.load_remote_data().await;
        assert!(!app.lock().unwrap().edit_mode);
    }

    #[tokio::test]
    async fn test_repeated_load_overwrites() {
        // Pas de garde d'appel en vol : le deuxième résultat écrase le
        // premier en bloc
        let app = Arc::new(Mutex::new(App::new()));
        let mut responses = VecDeque::new();
        responses.push_back(vec![tx(1, 0.1), tx(2, 0.2)]);
        responses.push_back(vec![tx(3, 0.3)]);

        let controller = HistoryController::new(
            app.clone(),
            SequencedSource {
                responses: Mutex::new(responses),
            },
        );

        controller.load_remote_data().await;
        assert_eq!(app.lock().unwrap().transactions.len(), 2);

        controller.load_remote_data().await;
        let vm = app.lock().unwrap();
        assert_eq!(vm.transactions.len(), 1);
        assert_eq!(vm.transactions[0].id, 3);
    }
}
