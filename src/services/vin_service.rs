//! Servicio de decodificación de VIN
//!
//! Consulta la API pública vPIC de la NHTSA para rellenar año/marca/modelo
//! al dar de alta un vehículo. Los resultados se memoizan en un cache
//! inyectado que vive en el AppState durante la sesión del proceso (sin
//! eviction). Cualquier fallo de red degrada a entrada manual: el alta
//! del vehículo nunca se bloquea por este servicio.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::utils::errors::AppError;

/// Datos decodificados de un VIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedVin {
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

/// Respuesta de vPIC DecodeVinValues
#[derive(Debug, Deserialize)]
struct VpicResponse {
    #[serde(rename = "Results")]
    results: Vec<VpicResult>,
}

#[derive(Debug, Deserialize)]
struct VpicResult {
    #[serde(rename = "ModelYear")]
    model_year: Option<String>,
    #[serde(rename = "Make")]
    make: Option<String>,
    #[serde(rename = "Model")]
    model: Option<String>,
}

/// Decodificador con cache explícito inyectado
#[derive(Clone)]
pub struct VinDecoder {
    http_client: reqwest::Client,
    base_url: String,
    cache: Arc<RwLock<HashMap<String, DecodedVin>>>,
}

impl VinDecoder {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Decodificar un VIN, con degradación a None ante cualquier fallo
    pub async fn decode(&self, vin: &str) -> Option<DecodedVin> {
        let normalized = vin.trim().to_uppercase();

        if let Some(hit) = self.cache.read().await.get(&normalized) {
            tracing::debug!("VIN {} resuelto desde cache", normalized);
            return Some(hit.clone());
        }

        match self.fetch(&normalized).await {
            Ok(decoded) => {
                self.cache
                    .write()
                    .await
                    .insert(normalized, decoded.clone());
                Some(decoded)
            }
            Err(e) => {
                tracing::warn!("Decodificación de VIN {} falló, entrada manual: {}", normalized, e);
                None
            }
        }
    }

    async fn fetch(&self, vin: &str) -> Result<DecodedVin, AppError> {
        let url = format!(
            "{}/vehicles/DecodeVinValues/{}?format=json",
            self.base_url, vin
        );

        let response = self
            .http_client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("vPIC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "vPIC returned status {}",
                response.status()
            )));
        }

        let body: VpicResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("vPIC response parse failed: {}", e)))?;

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi("vPIC returned no results".to_string()))?;

        Ok(DecodedVin {
            year: non_empty(result.model_year),
            make: non_empty(result.make),
            model: non_empty(result.model),
        })
    }

    /// Número de VINs memoizados (para diagnóstico)
    pub async fn cached_count(&self) -> usize {
        self.cache.read().await.len()
    }
}

// vPIC devuelve "" en los campos que no pudo resolver
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_filters_blank_fields() {
        assert_eq!(non_empty(Some("Chevrolet".to_string())), Some("Chevrolet".to_string()));
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[tokio::test]
    async fn decode_degrades_to_none_when_api_is_unreachable() {
        // puerto cerrado: la request falla y el alta sigue en manual
        let decoder = VinDecoder::new("http://127.0.0.1:9".to_string());
        assert_eq!(decoder.decode("1GNSKCKC0FR123456").await, None);
        assert_eq!(decoder.cached_count().await, 0);
    }
}
