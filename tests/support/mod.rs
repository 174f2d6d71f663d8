#![allow(dead_code)]

pub mod mock_webhook;

use serde_json::{Value, json};

/// A month payload shaped like a real webhook answer.
#[must_use]
pub fn december_payload() -> Value {
    json!({
        "reply": "12월 프로모션 추천입니다.",
        "calendar_raw": [
            {"date": "2025-12-25", "country": "KR", "name": "성탄절"},
            {"date": "2025-12-31", "country": "JP", "name": "大晦日"},
            {"date": "2026-01-01", "country": "KR", "name": "신정"}
        ],
        "search_data": [
            {"keyword": "향수", "rank": 2, "search_volume": 800, "month": "2025-12"},
            {"keyword": "립스틱", "rank": 1, "search_volume": 500, "month": "12월"},
            {"keyword": "선크림", "rank": 1, "search_volume": 900, "month": 7}
        ],
        "promotions_by_region": [
            {"region": "KR", "items": [
                {"theme": "연말 선물", "products": ["향수", "세트"]},
                {"theme": "연말 선물", "products": ["중복"]},
                {"theme": "겨울 스킨케어", "products": ["크림"]}
            ]}
        ],
        "recommended_products_by_region": [
            {"region": "KR", "items": [
                {"sku": "P1", "name": "향수 기프트 세트", "category": "Fragrance", "stock": 12,
                 "scores": {"final": 0.91}, "suggested_mechanic": "GWP"},
                {"sku": "P2", "name": "수분 크림", "category": "Skincare", "stock": 30,
                 "scores": {"final": 0.88}},
                {"sku": "P3", "name": "핸드 크림", "category": "Skincare", "stock": 5,
                 "scores": {"total": 0.5}},
                {"sku": "P4", "name": "립밤", "category": "Makeup", "scores": {}}
            ]}
        ],
        "ats": {
            "month": "2025-12",
            "regions": [
                {"region": "KR",
                 "macro_issue": "고환율 지속 • 연말 소비 회복",
                 "shopping_trend": ["기프트 세트 강세"],
                 "hashtags": {"macro_issue": ["환율", "#연말"]}}
            ]
        }
    })
}
