use serde::{Deserialize, Serialize};

/// Icon labels a category can carry. The server stores the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryIcon {
    Car,
    Shopping,
    Bills,
    Growth,
}

impl CategoryIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Growth => "Growth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "car" => Some(Self::Car),
            "shopping" => Some(Self::Shopping),
            "bills" => Some(Self::Bills),
            "growth" => Some(Self::Growth),
            _ => None,
        }
    }

    pub fn all() -> &'static [CategoryIcon] {
        &[Self::Car, Self::Shopping, Self::Bills, Self::Growth]
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Car => "🚗",
            Self::Shopping => "🛒",
            Self::Bills => "💵",
            Self::Growth => "📈",
        }
    }

    /// The icon after this one, wrapping around.
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|i| i == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl std::fmt::Display for CategoryIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    /// Icon label as stored by the server. Unknown labels are kept verbatim.
    #[serde(default)]
    pub icon: String,
}

impl Category {
    #[cfg(test)]
    pub fn new(label: String, icon: CategoryIcon) -> Self {
        Self {
            id: None,
            label,
            icon: icon.as_str().to_string(),
        }
    }

    pub fn icon_kind(&self) -> Option<CategoryIcon> {
        CategoryIcon::parse(&self.icon)
    }

    /// Glyph for known icons, the raw label otherwise.
    pub fn display_icon(&self) -> String {
        match self.icon_kind() {
            Some(icon) => icon.glyph().to_string(),
            None => self.icon.clone(),
        }
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.id.as_deref() == Some(id))
    }

    /// Every category whose label matches (case-insensitive). Labels are
    /// not unique.
    pub fn with_label<'a>(categories: &'a [Category], label: &str) -> Vec<&'a Category> {
        let lower = label.trim().to_lowercase();
        categories
            .iter()
            .filter(|c| c.label.to_lowercase() == lower)
            .collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Body of `POST /category` and `PATCH /category/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub label: String,
    pub icon: String,
}
