//! Product and return-policy catalogs, and the customer-support tools over them.

use async_trait::async_trait;
use llm_client::ToolSpec;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{string_param, title_case, Lookup, Tool};
use crate::error::ToolError;

pub const SUPPORT_CONTACT: &str = "1-800-SUPPORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: &'static str,
    pub price: &'static str,
    pub specs: &'static str,
    pub features: &'static str,
}

/// Products by category, in catalog order.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    categories: Vec<(&'static str, Vec<Product>)>,
}

impl ProductCatalog {
    pub fn new(categories: Vec<(&'static str, Vec<Product>)>) -> Self {
        Self { categories }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            (
                "laptops",
                vec![
                    Product {
                        name: "Gaming Laptop Pro",
                        price: "$1,299",
                        specs: "Intel i7, 16GB RAM, RTX 4060, 512GB SSD",
                        features: "144Hz display, RGB keyboard, advanced cooling",
                    },
                    Product {
                        name: "Business Laptop Elite",
                        price: "$899",
                        specs: "Intel i5, 8GB RAM, Integrated graphics, 256GB SSD",
                        features: "Lightweight, 12-hour battery, fingerprint reader",
                    },
                ],
            ),
            (
                "smartphones",
                vec![
                    Product {
                        name: "iPhone 14",
                        price: "$799",
                        specs: "A15 Bionic chip, 128GB storage, 6.1-inch display",
                        features: "Advanced camera system, Face ID, 5G capable",
                    },
                    Product {
                        name: "Galaxy S23",
                        price: "$699",
                        specs: "Snapdragon 8 Gen 2, 128GB storage, 6.1-inch display",
                        features: "Triple camera, S Pen compatible, wireless charging",
                    },
                ],
            ),
            (
                "headphones",
                vec![
                    Product {
                        name: "Gaming Headset X",
                        price: "$149",
                        specs: "7.1 surround sound, 50mm drivers, USB/3.5mm",
                        features: "Noise canceling mic, RGB lighting, comfortable padding",
                    },
                    Product {
                        name: "Wireless Earbuds Pro",
                        price: "$199",
                        specs: "Active noise cancellation, 6-hour battery + case",
                        features: "Wireless charging, water resistant, premium audio",
                    },
                ],
            ),
            (
                "gaming consoles",
                vec![Product {
                    name: "Gaming Console Pro",
                    price: "$499",
                    specs: "Custom AMD processor, 1TB SSD, 4K gaming",
                    features: "Ray tracing, 120fps support, backward compatibility",
                }],
            ),
        ])
    }

    pub fn categories(&self) -> Vec<&'static str> {
        self.categories.iter().map(|(name, _)| *name).collect()
    }

    /// Exact, case-insensitive category match.
    pub fn lookup(&self, category: &str) -> Lookup<&[Product]> {
        let wanted = category.trim().to_lowercase();
        match self.categories.iter().find(|(name, _)| *name == wanted) {
            Some((_, products)) => Lookup::Found(products.as_slice()),
            None => Lookup::NotFound {
                available: self.categories(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnPolicy {
    pub return_period: &'static str,
    pub condition: &'static str,
    pub restocking_fee: &'static str,
    pub exceptions: &'static str,
}

#[derive(Debug, Clone)]
pub struct ReturnPolicyCatalog {
    policies: Vec<(&'static str, ReturnPolicy)>,
}

impl ReturnPolicyCatalog {
    pub fn new(policies: Vec<(&'static str, ReturnPolicy)>) -> Self {
        Self { policies }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            (
                "electronics",
                ReturnPolicy {
                    return_period: "30 days",
                    condition: "Original packaging and accessories required",
                    restocking_fee: "15% for opened items",
                    exceptions: "Custom configured items non-returnable",
                },
            ),
            (
                "laptops",
                ReturnPolicy {
                    return_period: "30 days",
                    condition: "Must be in original condition with all accessories",
                    restocking_fee: "20% if opened and used",
                    exceptions: "Custom builds and software installations void return",
                },
            ),
            (
                "smartphones",
                ReturnPolicy {
                    return_period: "14 days",
                    condition: "Must be unlocked and factory reset",
                    restocking_fee: "25% restocking fee applies",
                    exceptions: "Carrier-locked phones have different terms",
                },
            ),
            (
                "headphones",
                ReturnPolicy {
                    return_period: "30 days",
                    condition: "Hygiene seal must be intact for returns",
                    restocking_fee: "No restocking fee if unopened",
                    exceptions: "Wireless earbuds non-returnable once opened",
                },
            ),
            (
                "gaming",
                ReturnPolicy {
                    return_period: "30 days",
                    condition: "All original packaging and accessories required",
                    restocking_fee: "10% restocking fee",
                    exceptions: "Digital game codes cannot be returned",
                },
            ),
        ])
    }

    pub fn categories(&self) -> Vec<&'static str> {
        self.policies.iter().map(|(name, _)| *name).collect()
    }

    /// Exact category first, then the first category that contains or is contained in the query.
    pub fn lookup(&self, category: &str) -> Lookup<(&'static str, &ReturnPolicy)> {
        let wanted = category.trim().to_lowercase();
        let found = if wanted.is_empty() {
            None
        } else {
            self.policies
                .iter()
                .find(|(name, _)| *name == wanted)
                .or_else(|| {
                    self.policies
                        .iter()
                        .find(|(name, _)| name.contains(&wanted) || wanted.contains(name))
                })
        };
        match found {
            Some((name, policy)) => Lookup::Found((*name, policy)),
            None => Lookup::NotFound {
                available: self.categories(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryArgs {
    product_category: String,
}

fn category_spec(name: &str, description: &str, param: &str) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        parameters: json!({
            "type": "object",
            "properties": { "product_category": string_param(param) },
            "required": ["product_category"],
        }),
    }
}

/// `get_product_info(product_category)`.
pub struct GetProductInfo {
    catalog: ProductCatalog,
}

impl GetProductInfo {
    pub const NAME: &'static str = "get_product_info";

    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    pub fn render(&self, category: &str) -> String {
        match self.catalog.lookup(category) {
            Lookup::Found(products) => {
                let mut out = format!("**{} Available:**\n\n", title_case(category));
                for product in products {
                    out.push_str(&format!(
                        "**{}**\nPrice: {}\nSpecs: {}\nFeatures: {}\n\n",
                        product.name, product.price, product.specs, product.features
                    ));
                }
                out
            }
            Lookup::NotFound { available } => format!(
                "Product category '{}' not found. Available categories: {}",
                category,
                available.join(", ")
            ),
        }
    }
}

#[async_trait]
impl Tool for GetProductInfo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        category_spec(
            Self::NAME,
            "Get detailed product information and specifications for a product category.",
            "Product category, e.g. 'laptops', 'smartphones', 'headphones', 'gaming consoles'",
        )
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: CategoryArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        Ok(self.render(&args.product_category))
    }
}

/// `get_return_policy(product_category)`.
pub struct GetReturnPolicy {
    catalog: ReturnPolicyCatalog,
}

impl GetReturnPolicy {
    pub const NAME: &'static str = "get_return_policy";

    pub fn new(catalog: ReturnPolicyCatalog) -> Self {
        Self { catalog }
    }

    pub fn render(&self, category: &str) -> String {
        match self.catalog.lookup(category) {
            Lookup::Found((name, policy)) => format!(
                "**Return Policy for {}:**\n\n\
                 **Return Period:** {}\n\
                 **Condition:** {}\n\
                 **Restocking Fee:** {}\n\
                 **Exceptions:** {}\n\n\
                 For specific questions, contact customer service at {}",
                title_case(name),
                policy.return_period,
                policy.condition,
                policy.restocking_fee,
                policy.exceptions,
                SUPPORT_CONTACT
            ),
            Lookup::NotFound { available } => format!(
                "No return policy found for '{}'. Available categories: {}",
                category,
                available.join(", ")
            ),
        }
    }
}

#[async_trait]
impl Tool for GetReturnPolicy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        category_spec(
            Self::NAME,
            "Get return policy information for a product category.",
            "Product category, e.g. 'electronics', 'laptops', 'smartphones', 'headphones', 'gaming'",
        )
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: CategoryArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        Ok(self.render(&args.product_category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_lookup_is_case_insensitive() {
        let catalog = ProductCatalog::standard();
        let products = catalog.lookup("Laptops").found().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Gaming Laptop Pro");
        assert_eq!(products[0].price, "$1,299");
    }

    #[test]
    fn unknown_product_category_lists_available() {
        let tool = GetProductInfo::new(ProductCatalog::standard());
        assert_eq!(
            tool.render("tablets"),
            "Product category 'tablets' not found. Available categories: laptops, smartphones, headphones, gaming consoles"
        );
    }

    #[test]
    fn return_policy_partial_match() {
        let catalog = ReturnPolicyCatalog::standard();
        let (name, policy) = catalog.lookup("gaming headset").found().unwrap();
        assert_eq!(name, "gaming");
        assert_eq!(policy.restocking_fee, "10% restocking fee");

        let (name, _) = catalog.lookup("phone").found().unwrap();
        assert_eq!(name, "smartphones");
    }

    #[test]
    fn empty_category_is_not_found() {
        assert!(ReturnPolicyCatalog::standard().lookup("  ").found().is_none());
    }

    #[tokio::test]
    async fn return_policy_tool_renders_policy() {
        let tool = GetReturnPolicy::new(ReturnPolicyCatalog::standard());
        let text = tool
            .call(json!({ "product_category": "smartphones" }))
            .await
            .unwrap();
        assert!(text.starts_with("**Return Policy for Smartphones:**"));
        assert!(text.contains("**Return Period:** 14 days"));
        assert!(text.contains("1-800-SUPPORT"));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid() {
        let tool = GetProductInfo::new(ProductCatalog::standard());
        let err = tool.call(json!({ "category": "laptops" })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool, .. } if tool == "get_product_info"));
    }
}
