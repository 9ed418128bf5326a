// 🏛️ Taxonomy Definition Tables
//
// Seven independent classification axes. Each category maps a display label to
// the 0/1 flag column on the token record plus a one-sentence definition.
// Category lists are domain content: reproduce them, never derive them.
//
// Definition order matters only as the tie-break when two categories have the
// same member count.

use serde::{Deserialize, Serialize};

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display label (e.g., "Payment Token")
    pub label: String,

    /// Flag column on the token record (e.g., "Payment_Token")
    pub field: String,

    /// Shown in the segment tooltip under the label
    pub definition: String,
}

impl Category {
    pub fn new(
        label: impl Into<String>,
        field: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Category {
            label: label.into(),
            field: field.into(),
            definition: definition.into(),
        }
    }
}

// ============================================================================
// TAXONOMY
// ============================================================================

/// One classification axis
///
/// Annotation text is per taxonomy, not per category: a token carries one
/// `Information_<suffix>` and one `Uncertainty_<suffix>` for the whole axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Stable key (e.g., "price_and_market")
    pub key: String,

    /// Section heading
    pub title: String,

    /// Section blurb shown above the bar
    pub description: String,

    /// Field holding the free-text annotation for this axis
    pub info_field: String,

    /// Field holding the optional uncertainty note for this axis
    pub uncertainty_field: String,

    pub categories: Vec<Category>,
}

impl Taxonomy {
    /// New taxonomy; annotation fields are derived from `suffix`
    /// (`Information_<suffix>` / `Uncertainty_<suffix>`).
    pub fn new(key: impl Into<String>, title: impl Into<String>, suffix: &str) -> Self {
        Taxonomy {
            key: key.into(),
            title: title.into(),
            description: String::new(),
            info_field: format!("Information_{}", suffix),
            uncertainty_field: format!("Uncertainty_{}", suffix),
            categories: Vec::new(),
        }
    }

    /// Builder: add section blurb
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: append a category (definition order is kept)
    pub fn with_category(mut self, label: &str, field: &str, definition: &str) -> Self {
        self.categories.push(Category::new(label, field, definition));
        self
    }

    pub fn category(&self, field: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.field == field)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ============================================================================
// TAXONOMY REGISTRY
// ============================================================================

/// All taxonomies in dashboard order
pub struct TaxonomyRegistry {
    taxonomies: Vec<Taxonomy>,
}

impl TaxonomyRegistry {
    pub fn new() -> Self {
        TaxonomyRegistry {
            taxonomies: Vec::new(),
        }
    }

    /// Registry with the seven built-in tables
    pub fn with_defaults() -> Self {
        let mut registry = TaxonomyRegistry::new();
        registry.register(token_class());
        registry.register(incentive());
        registry.register(price_and_market());
        registry.register(risk_and_security());
        registry.register(vesting_and_cliff());
        registry.register(distribution());
        registry.register(governance());
        registry
    }

    /// Register a taxonomy; a taxonomy with the same key is replaced in place
    pub fn register(&mut self, taxonomy: Taxonomy) {
        match self.taxonomies.iter_mut().find(|t| t.key == taxonomy.key) {
            Some(existing) => *existing = taxonomy,
            None => self.taxonomies.push(taxonomy),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Taxonomy> {
        self.taxonomies.iter().find(|t| t.key == key)
    }

    pub fn list_keys(&self) -> Vec<&str> {
        self.taxonomies.iter().map(|t| t.key.as_str()).collect()
    }

    pub fn list_all(&self) -> &[Taxonomy] {
        &self.taxonomies
    }

    pub fn count(&self) -> usize {
        self.taxonomies.len()
    }
}

impl Default for TaxonomyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

pub fn token_class() -> Taxonomy {
    Taxonomy::new("class", "Token Class", "Class")
        .with_description(
            "Utility Token provide access to a product or service within a specific blockchain ecosystem. \
             Payment Token serve primarily as a medium of exchange for goods and services, like digital currency. \
             Investment Token represent an asset or profit share, often regulated as a security or investment vehicle.",
        )
        .with_category(
            "Payment Token",
            "Payment_Token",
            "Primarily serves as a medium of exchange for goods and services, similar to digital currency.",
        )
        .with_category(
            "Utility Token",
            "Utility_Token",
            "Provides access to a specific product or service within a blockchain ecosystem.",
        )
        .with_category(
            "Investment Token",
            "Investment_Token",
            "Represents an asset, profit share, or other investment interest, often subject to regulation.",
        )
        .with_category(
            "Other Class",
            "Other_Class",
            "Any token classification not covered by the main categories.",
        )
}

pub fn incentive() -> Taxonomy {
    Taxonomy::new("incentive", "Incentive mechanism", "Incentive")
        .with_description(
            "An incentive mechanism is a structured system of rewards and penalties used in blockchain and token economies \
             to influence participant behavior, encourage desired actions, deter harmful activities, and ensure alignment \
             between individual incentives and the overall network\u{2019}s goals and sustainability.",
        )
        .with_category(
            "Staking Rewards",
            "Staking_Rewards",
            "Tokens distributed as rewards for locking up tokens to support network security and operations.",
        )
        .with_category(
            "Liquidity Mining",
            "Liquidity_Mining",
            "Tokens awarded to users who provide liquidity to decentralized exchanges or lending platforms.",
        )
        .with_category(
            "Governance Token Systems",
            "Governance_Token_Systems",
            "Tokens that grant holders the right to participate in decision-making processes within a protocol.",
        )
        .with_category(
            "Yield Farming",
            "Yield_Farming",
            "The practice of earning rewards by strategically moving funds between different DeFi protocols.",
        )
        .with_category(
            "Token-Based User Rewards",
            "Token_Based_User_Rewards",
            "Tokens given to users as incentives for engagement, activity, or loyalty within a platform.",
        )
        .with_category(
            "Other Incentive",
            "Other_Incentive",
            "Any incentive mechanism not covered by the main categories.",
        )
}

pub fn price_and_market() -> Taxonomy {
    Taxonomy::new("price_and_market", "Price and Market Mechanism", "Price_and_Market")
        .with_description(
            "A price and market mechanism is the process by which supply and demand interact in a market to determine \
             prices, allocate resources, and guide production, consumption, and investment decisions through signals.",
        )
        .with_category(
            "Fixed Supply",
            "Fixed_Supply",
            "The total number of tokens is capped and cannot be increased.",
        )
        .with_category(
            "Inflationary Supply",
            "Inflationary_Supply_Mining",
            "New tokens are continuously created, increasing total supply over time.",
        )
        .with_category(
            "Deflationary Mechanisms",
            "Deflationary_Mechanisms",
            "Tokenomics design features that reduce a token\u{2019}s circulating supply over time to create scarcity and \
             potentially increase its value. Common methods include token burns, buybacks, halving events, and \
             decreasing emission schedules.",
        )
        .with_category(
            "Halving or Exponential Decay",
            "Halving_or_Exponential_Decay",
            "Token issuance rate decreases periodically or exponentially over time.",
        )
        .with_category(
            "Dynamic Minting and Burning",
            "Dynamic_Minting_and_Burning",
            "Tokens are created or destroyed based on demand or network conditions.",
        )
        .with_category(
            "Bonding Curves",
            "Bonding_Curves",
            "Price is algorithmically determined by a predefined mathematical curve.",
        )
        .with_category(
            "Continuous Auctions and Streaming",
            "Continuous_Auctions_and_Streaming",
            "Tokens are distributed through ongoing auctions or time-based streams.",
        )
        .with_category(
            "Vesting and Staged Releases",
            "Vesting_and_Staged_Releases",
            "Tokens are unlocked gradually over a set period or in stages.",
        )
        .with_category(
            "AMM Pricing",
            "AMM_Pricing",
            "Prices are determined automatically by liquidity pools using set formulas.",
        )
        .with_category(
            "DAO Governance Controlled Pricing",
            "DAO_Governance_Controlled_Pricing",
            "Token price or supply is adjusted based on decisions by DAO members.",
        )
        .with_category(
            "Other Price and Market Mechanism",
            "Other_Price_and_Market",
            "Any alternative pricing or market approach not covered by other categories.",
        )
}

pub fn risk_and_security() -> Taxonomy {
    Taxonomy::new("risk_and_security", "Risk and Security Mechanism", "Risk_and_Security")
        .with_description(
            "A risk and security mechanism for tokens refers to the safeguards, policies, and technical measures \
             implemented to protect a blockchain project\u{2019}s assets, users, and infrastructure from vulnerabilities, \
             attacks, and operational failures, ensuring trust, stability, and regulatory compliance.",
        )
        .with_category(
            "Smart Contract Audits",
            "Smart_Contract_Audits",
            "Independent reviews of smart contract code to identify and fix vulnerabilities before deployment.",
        )
        .with_category(
            "Bug Bounty Programs",
            "Bug_Bounty_Programs",
            "Incentive programs that reward security researchers for discovering and responsibly disclosing vulnerabilities.",
        )
        .with_category(
            "Multi-Signature Wallets",
            "Multi_Signature_Wallets",
            "Wallets requiring multiple private keys to authorize a transaction, reducing the risk of single-point compromise.",
        )
        .with_category(
            "Insurance Funds",
            "Insurance_Funds",
            "Funds set aside to compensate users in case of hacks, exploits, or other significant losses.",
        )
        .with_category(
            "Decentralized Governance",
            "Decentralized_Governance",
            "Decision-making processes controlled collectively by token holders rather than a central authority.",
        )
        .with_category(
            "Rate Limiting and Circuit Breakers",
            "Rate_Limiting_and_Circuit_Breakers",
            "Mechanisms that restrict or pause operations to prevent abuse, system overload, or cascading failures.",
        )
        .with_category(
            "Token Vesting and Lockups",
            "Token_Vesting_and_Lockups",
            "Scheduled release of tokens over time to align incentives and reduce market dumping.",
        )
        .with_category(
            "Oracle Security",
            "Oracle_Security",
            "Measures ensuring the integrity and reliability of external data feeds used by smart contracts.",
        )
        .with_category(
            "Slashing Mechanisms",
            "Slashing_Mechanisms",
            "Penalties that remove part of a participant\u{2019}s staked assets for malicious or negligent behavior.",
        )
        .with_category(
            "KYC / AML Compliance",
            "KYC_AML_Compliance",
            "Verification of user identities and monitoring of transactions to meet regulatory requirements.",
        )
        .with_category(
            "Other Risk and Security",
            "Other_Risk_and_Security",
            "Any other measures or mechanisms to mitigate risks and enhance platform security not covered by other categories.",
        )
}

pub fn vesting_and_cliff() -> Taxonomy {
    Taxonomy::new("vesting_and_cliff", "Vesting and Cliff", "Vesting_and_Cliff")
        .with_description(
            "A vesting and cliff schedule defines when and how allocated tokens are released to recipients over time. \
             The cliff is an initial waiting period during which no tokens are released, followed by a vesting phase \
             where tokens are unlocked gradually or in milestones. These mechanisms align incentives, prevent immediate \
             sell-offs, and encourage long-term commitment from team members, investors, and other stakeholders.",
        )
        .with_category(
            "Cliff Period",
            "Cliff_Period",
            "Fixed initial period during which no tokens are released; after expiration, a portion or all allocated tokens are unlocked.",
        )
        .with_category(
            "Linear Vesting",
            "Linear_Vesting",
            "Steady, proportional release of tokens over a defined period.",
        )
        .with_category(
            "Graded Vesting",
            "Graded_Vesting",
            "Release of tokens in multiple predefined tranches at set intervals.",
        )
        .with_category(
            "Milestone-Based Vesting",
            "Milestone_Based_Vesting",
            "Token release triggered only upon reaching specific project or performance milestones.",
        )
        .with_category(
            "Hybrid Vesting",
            "Hybrid_Vesting",
            "Combination of different vesting methods, such as cliff plus linear or cliff plus milestone-based.",
        )
        .with_category(
            "Revocable Vesting",
            "Revocable_Vesting",
            "A vesting arrangement that can be terminated early by the project or issuer under certain conditions.",
        )
        .with_category(
            "Non-Revocable Vesting",
            "Non_Revocable_Vesting",
            "A vesting arrangement that cannot be unilaterally terminated once it has begun.",
        )
        .with_category(
            "Team & Founder Vesting",
            "Team_Founder_Vesting",
            "Vesting schedules specifically applied to team members and project founders.",
        )
        .with_category(
            "Investor Vesting",
            "Investor_Vesting",
            "Vesting schedules applied to private or institutional investors.",
        )
        .with_category(
            "Community Incentive Vesting",
            "Community_Incentive_Vesting",
            "Vesting schedules for tokens allocated to community rewards or incentive programs.",
        )
        .with_category(
            "Other Vesting and Cliff",
            "Other_Vesting_and_Cliff",
            "Any other vesting or cliff arrangements not covered by the above categories.",
        )
}

pub fn distribution() -> Taxonomy {
    Taxonomy::new("distribution", "Distribution", "Distribution")
        .with_description(
            "The process by which a project allocates and delivers its tokens to various stakeholders or the public. \
             Distribution methods can include sales, rewards, incentives, or free allocations, and are designed to fund \
             development, encourage adoption, and align the interests of investors, team members, and the community.",
        )
        .with_category(
            "Airdrops",
            "Airdrops",
            "Free distribution of tokens to multiple wallet addresses, often used to promote awareness and adoption.",
        )
        .with_category(
            "Initial Coin Offering (ICO)",
            "Initial_Coin_Offering",
            "A fundraising method where new cryptocurrency tokens are sold to early investors before being listed on exchanges.",
        )
        .with_category(
            "Initial Exchange Offering (IEO)",
            "Initial_Exchange_Offering",
            "A token sale conducted through a centralized exchange, which manages the fundraising process on behalf of the project.",
        )
        .with_category(
            "Security Token Offering (STO)",
            "Security_Token_Offering",
            "A regulated token sale where the tokens represent securities, subject to compliance with applicable financial regulations.",
        )
        .with_category(
            "Initial DEX Offering (IDO)",
            "Initial_DEX_Offering",
            "A token sale conducted through a decentralized exchange (DEX), often using automated liquidity pools.",
        )
        .with_category(
            "Liquidity Bootstrapping Pool (LBP)",
            "Liquidity_Bootstrapping_Pool",
            "A mechanism that uses a token pool with adjustable weights to distribute tokens while reducing price manipulation during launch.",
        )
        .with_category(
            "Fair Launch",
            "Fair_Launch",
            "A token distribution where all participants have equal access without private sales or preferential allocations.",
        )
        .with_category(
            "Direct Sale",
            "Direct_Sale",
            "Tokens sold directly by the project team to buyers without an intermediary exchange or fundraising event.",
        )
        .with_category(
            "Community Incentives",
            "Community_Incentives",
            "Tokens allocated to reward community participation, contributions, and engagement.",
        )
        .with_category(
            "Bounty Programs",
            "Bounty_Programs",
            "Rewards given to users who complete specific tasks such as promoting the project, finding bugs, or contributing content.",
        )
        .with_category(
            "Other Distribution",
            "Other_Distribution",
            "Any other method of token distribution not covered by the above categories.",
        )
}

pub fn governance() -> Taxonomy {
    Taxonomy::new("governance", "Governance", "Governance")
        .with_description(
            "The systems, rules, and processes through which decisions are made and implemented within a blockchain \
             project or decentralized network. Governance defines how stakeholders propose, debate, and vote on changes \
             to protocols, allocate resources, and set strategic direction, aiming to balance transparency, efficiency, \
             and community participation.",
        )
        .with_category(
            "On-Chain Governance",
            "On_Chain_Governance",
            "Governance processes executed directly on the blockchain through smart contracts, enabling transparent and verifiable decision-making.",
        )
        .with_category(
            "Off-Chain Governance",
            "Off_Chain_Governance",
            "Governance processes conducted outside the blockchain, such as forum discussions or social consensus, with results later implemented on-chain.",
        )
        .with_category(
            "DAO Governance",
            "DAO_Governance",
            "Decision-making managed by a Decentralized Autonomous Organization, where token holders collectively govern project rules and resources.",
        )
        .with_category(
            "Delegated Voting",
            "Delegated_Voting",
            "A governance model where participants delegate their voting power to trusted representatives to make decisions on their behalf.",
        )
        .with_category(
            "Quadratic Voting",
            "Quadratic_Voting",
            "A voting system where the cost of casting additional votes increases quadratically, balancing influence between large and small stakeholders.",
        )
        .with_category(
            "Multi-Signature Control",
            "Multi_Signature_Control",
            "Governance or fund management requiring multiple authorized parties to approve an action before it is executed.",
        )
        .with_category(
            "Council-Based Governance",
            "Council_Based_Governance",
            "Governance led by a designated council or committee, often elected or appointed to represent the community or stakeholders.",
        )
        .with_category(
            "Proposal Voting Systems",
            "Proposal_Voting_Systems",
            "Mechanisms for submitting and voting on proposals to change project parameters, allocate resources, or introduce new features.",
        )
        .with_category(
            "Time-Locked Governance",
            "Time_Locked_Governance",
            "Governance actions that include a delay period before execution, allowing stakeholders to react or challenge decisions.",
        )
        .with_category(
            "Community Treasury Voting",
            "Community_Treasury_Voting",
            "Community-driven decision-making over the allocation and use of treasury funds.",
        )
        .with_category(
            "Other Governance",
            "Other_Governance",
            "Any governance approach not covered by the above categories.",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_seven_taxonomies_in_dashboard_order() {
        let registry = TaxonomyRegistry::with_defaults();
        assert_eq!(registry.count(), 7);
        assert_eq!(
            registry.list_keys(),
            vec![
                "class",
                "incentive",
                "price_and_market",
                "risk_and_security",
                "vesting_and_cliff",
                "distribution",
                "governance",
            ]
        );
    }

    #[test]
    fn test_category_counts_per_table() {
        let registry = TaxonomyRegistry::with_defaults();
        let sizes: Vec<usize> = registry.list_all().iter().map(|t| t.len()).collect();
        assert_eq!(sizes, vec![4, 6, 11, 11, 11, 11, 11]);
    }

    #[test]
    fn test_fields_unique_within_each_taxonomy() {
        for taxonomy in TaxonomyRegistry::with_defaults().list_all() {
            let fields: HashSet<&str> =
                taxonomy.categories.iter().map(|c| c.field.as_str()).collect();
            assert_eq!(fields.len(), taxonomy.len(), "duplicate field in {}", taxonomy.key);
        }
    }

    #[test]
    fn test_annotation_fields_follow_suffix() {
        let price = price_and_market();
        assert_eq!(price.info_field, "Information_Price_and_Market");
        assert_eq!(price.uncertainty_field, "Uncertainty_Price_and_Market");

        // Label and field differ for this one
        let inflationary = price.category("Inflationary_Supply_Mining").unwrap();
        assert_eq!(inflationary.label, "Inflationary Supply");
    }

    #[test]
    fn test_register_replaces_same_key() {
        let mut registry = TaxonomyRegistry::with_defaults();
        registry.register(
            Taxonomy::new("class", "Token Class", "Class")
                .with_category("Only", "Only", "Single category"),
        );

        assert_eq!(registry.count(), 7);
        assert_eq!(registry.get("class").unwrap().len(), 1);
        assert_eq!(registry.list_keys()[0], "class");
    }
}
