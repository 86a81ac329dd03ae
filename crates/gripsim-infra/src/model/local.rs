// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use gripsim_core::control::{DofSet, EigVals, QueryState};
use gripsim_core::math::{DofVector, Vec2};
use gripsim_core::model::{
    DofQuery, DofUpdate, ModelService, ProtocolError, DEFAULT_MODEL_NAME,
};

/// Name of the model that always answers with the standard axes.
pub const IDENTITY_MODEL_NAME: &str = "identity";

/// An in-process model used when no model server is configured.
///
/// `default` points the DoFs at the scene: towards the first box, rotation
/// towards its orientation, towards the target, and the grip. `identity`
/// answers with the four standard control axes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalModelService;

impl LocalModelService {
    /// Creates the service.
    pub fn new() -> Self {
        Self
    }

    fn scene_dofs(state: &QueryState) -> DofUpdate {
        let [tx, ty, bx, by, brot, ..] = state.0;
        let to_box = Vec2::new(bx, by);
        let to_target = Vec2::new(tx, ty);

        let towards = |v: Vec2| {
            let n = v.normalize();
            if n == Vec2::ZERO {
                DofVector::TRANSLATE_X
            } else {
                DofVector::new(n.x, n.y, 0.0, 0.0)
            }
        };
        let turn = if brot < 0.0 { -1.0 } else { 1.0 };

        let dofs = DofSet([
            towards(to_box),
            DofVector::ROTATE * turn,
            towards(to_target),
            DofVector::GRIP,
        ]);
        let eig_vals: EigVals = [to_box.length(), brot.abs(), to_target.length(), 0.0];
        DofUpdate { dofs, eig_vals }
    }

    fn identity_dofs() -> DofUpdate {
        DofUpdate {
            dofs: DofSet([
                DofVector::TRANSLATE_X,
                DofVector::TRANSLATE_Y,
                DofVector::ROTATE,
                DofVector::GRIP,
            ]),
            eig_vals: [1.0; 4],
        }
    }
}

#[async_trait]
impl ModelService for LocalModelService {
    async fn model_names(&self) -> Result<Vec<String>, ProtocolError> {
        Ok(vec![
            DEFAULT_MODEL_NAME.to_owned(),
            IDENTITY_MODEL_NAME.to_owned(),
        ])
    }

    async fn about(&self, model: &str) -> Result<String, ProtocolError> {
        match model {
            DEFAULT_MODEL_NAME => Ok("Scene heuristic: box, box rotation, target, grip".into()),
            IDENTITY_MODEL_NAME => Ok("Standard axes: x, y, rotation, grip".into()),
            other => Err(ProtocolError::UnknownModel(other.to_owned())),
        }
    }

    async fn query_dofs(&self, query: &DofQuery) -> Result<DofUpdate, ProtocolError> {
        match query.model.as_str() {
            DEFAULT_MODEL_NAME => Ok(Self::scene_dofs(&query.state)),
            IDENTITY_MODEL_NAME => Ok(Self::identity_dofs()),
            other => Err(ProtocolError::UnknownModel(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[tokio::test]
    async fn test_default_model_points_at_scene() {
        let service = LocalModelService::new();
        let query = DofQuery {
            model: DEFAULT_MODEL_NAME.into(),
            state: QueryState([0.0, -50.0, 30.0, 40.0, -0.5, 0.0, 0.0, 0.0]),
        };
        let update = service.query_dofs(&query).await.unwrap();
        assert_abs_diff_eq!(
            update.dofs[0],
            DofVector::new(0.6, 0.8, 0.0, 0.0),
            epsilon = 1e-6
        );
        assert_eq!(update.dofs[1], DofVector::new(0.0, 0.0, -1.0, 0.0));
        assert_eq!(update.dofs[2], DofVector::new(0.0, -1.0, 0.0, 0.0));
        assert_eq!(update.dofs[3], DofVector::GRIP);
        assert_eq!(update.eig_vals, [50.0, 0.5, 50.0, 0.0]);
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected() {
        let service = LocalModelService::new();
        let names = service.model_names().await.unwrap();
        assert!(names.contains(&"identity".to_string()));
        let err = service.about("nope").await.unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownModel(name) if name == "nope"));
    }
}
