//! HTTP API handlers for placerec-server

pub mod health;
pub mod recommendations;

pub use health::health_routes;
pub use recommendations::{
    create_recommendation, list_recommendations, ranked_recommendations, recommendation_routes,
    CreateRecommendationRequest,
};
