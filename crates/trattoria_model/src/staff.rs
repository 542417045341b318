//! Staff members, their roles and contracts.
//!
//! A [`Staff`] record holds its role and contract as sum types. The flat
//! [`StaffDraft`] is the construction and storage form: it carries every
//! role's and contract's attributes as options, and two conditional
//! validators decide which of them must and may be set for its tags.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use trattoria_foundation::{EntityId, Error, Money, Result};
use trattoria_storage::{ConditionalValidator, Discriminated};

use crate::check;

/// Seniority of a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManagerLevel {
    /// Entry level.
    Junior,
    /// Middle management.
    Mid,
    /// Most senior.
    Senior,
}

/// Working shift of a full-time contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftPattern {
    /// Morning shift.
    Morning,
    /// Evening shift.
    Evening,
    /// Night shift.
    Night,
}

/// What a staff member does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Manages other staff and hires or fires.
    Manager {
        /// Seniority, used to decide who may manage whom.
        level: ManagerLevel,
    },
    /// Takes payments and issues refunds.
    Cashier {
        /// Whether the cashier may open the vault.
        vault_access: bool,
    },
    /// Seats customers.
    Waiter {
        /// Number of tables served.
        tables: u32,
    },
    /// Cooks.
    Chef,
    /// Runs the kitchen and its inventory.
    HeadChef {
        /// The dish the head chef is known for.
        signature_dish: String,
    },
}

impl Role {
    /// Returns the discriminant of this role.
    #[must_use]
    pub fn tag(&self) -> RoleTag {
        match self {
            Role::Manager { .. } => RoleTag::Manager,
            Role::Cashier { .. } => RoleTag::Cashier,
            Role::Waiter { .. } => RoleTag::Waiter,
            Role::Chef => RoleTag::Chef,
            Role::HeadChef { .. } => RoleTag::HeadChef,
        }
    }

    /// Returns the manager level, if this is a manager.
    #[must_use]
    pub fn level(&self) -> Option<ManagerLevel> {
        match self {
            Role::Manager { level } => Some(*level),
            _ => None,
        }
    }
}

/// Employment terms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contract {
    /// Salaried, on a fixed shift.
    FullTime {
        /// Assigned shift.
        shift: ShiftPattern,
        /// Fixed salary.
        salary: Money,
    },
    /// Paid by the hour.
    PartTime {
        /// Contracted hours.
        hours: u32,
        /// Pay per hour.
        hourly_rate: Money,
    },
}

impl Contract {
    /// Returns the discriminant of this contract.
    #[must_use]
    pub fn tag(&self) -> ContractTag {
        match self {
            Contract::FullTime { .. } => ContractTag::FullTime,
            Contract::PartTime { .. } => ContractTag::PartTime,
        }
    }

    /// Returns the pay: the fixed salary, or hours times rate.
    #[must_use]
    pub fn salary(&self) -> Money {
        match self {
            Contract::FullTime { salary, .. } => *salary,
            Contract::PartTime { hours, hourly_rate } => *hourly_rate * *hours,
        }
    }
}

/// Role discriminant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTag {
    /// See [`Role::Manager`].
    Manager,
    /// See [`Role::Cashier`].
    Cashier,
    /// See [`Role::Waiter`].
    Waiter,
    /// See [`Role::Chef`].
    #[default]
    Chef,
    /// See [`Role::HeadChef`].
    HeadChef,
}

/// Contract discriminant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractTag {
    /// See [`Contract::FullTime`].
    #[default]
    FullTime,
    /// See [`Contract::PartTime`].
    PartTime,
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoleTag::Manager => "manager",
            RoleTag::Cashier => "cashier",
            RoleTag::Waiter => "waiter",
            RoleTag::Chef => "chef",
            RoleTag::HeadChef => "head chef",
        };
        f.write_str(name)
    }
}

static ROLE_RULES: LazyLock<ConditionalValidator<RoleTag>> = LazyLock::new(|| {
    ConditionalValidator::new("role", &["level", "vault_access", "tables", "signature_dish"])
        .rule(RoleTag::Manager, &["level"], &[])
        .rule(RoleTag::Cashier, &["vault_access"], &[])
        .rule(RoleTag::Waiter, &["tables"], &[])
        .rule(RoleTag::Chef, &[], &[])
        .rule(RoleTag::HeadChef, &["signature_dish"], &[])
});

static CONTRACT_RULES: LazyLock<ConditionalValidator<ContractTag>> = LazyLock::new(|| {
    ConditionalValidator::new("contract", &["shift", "salary", "hours", "hourly_rate"])
        .rule(ContractTag::FullTime, &["shift", "salary"], &[])
        .rule(ContractTag::PartTime, &["hours", "hourly_rate"], &[])
});

/// Flat construction and storage form of a staff member.
///
/// Built with [`StaffDraft::new`] and the role and contract setters, then
/// turned into a [`Staff`] by [`StaffDraft::build`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDraft {
    /// Identity.
    pub id: EntityId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Department.
    pub department: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Role discriminant.
    pub role: RoleTag,
    /// Manager level.
    pub level: Option<ManagerLevel>,
    /// Cashier vault access.
    pub vault_access: Option<bool>,
    /// Tables served by a waiter.
    pub tables: Option<u32>,
    /// Head chef's signature dish.
    pub signature_dish: Option<String>,
    /// Contract discriminant.
    pub contract: ContractTag,
    /// Full-time shift.
    pub shift: Option<ShiftPattern>,
    /// Full-time salary.
    pub salary: Option<Money>,
    /// Part-time hours.
    pub hours: Option<u32>,
    /// Part-time hourly rate.
    pub hourly_rate: Option<Money>,
}

impl Discriminated<RoleTag> for StaffDraft {
    fn discriminant(&self) -> RoleTag {
        self.role
    }

    fn is_populated(&self, attribute: &str) -> bool {
        match attribute {
            "level" => self.level.is_some(),
            "vault_access" => self.vault_access.is_some(),
            "tables" => self.tables.is_some(),
            "signature_dish" => self.signature_dish.is_some(),
            _ => false,
        }
    }
}

impl Discriminated<ContractTag> for StaffDraft {
    fn discriminant(&self) -> ContractTag {
        self.contract
    }

    fn is_populated(&self, attribute: &str) -> bool {
        match attribute {
            "shift" => self.shift.is_some(),
            "salary" => self.salary.is_some(),
            "hours" => self.hours.is_some(),
            "hourly_rate" => self.hourly_rate.is_some(),
            _ => false,
        }
    }
}

fn present<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::validation(field, "is required"))
}

impl StaffDraft {
    /// Starts a draft for a full-time chef with no shift or salary yet.
    #[must_use]
    pub fn new(
        id: EntityId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            phone: None,
            email: None,
            role: RoleTag::default(),
            level: None,
            vault_access: None,
            tables: None,
            signature_dish: None,
            contract: ContractTag::default(),
            shift: None,
            salary: None,
            hours: None,
            hourly_rate: None,
        }
    }

    /// Sets the role to manager.
    #[must_use]
    pub fn manager(mut self, level: ManagerLevel) -> Self {
        self.role = RoleTag::Manager;
        self.level = Some(level);
        self
    }

    /// Sets the role to cashier.
    #[must_use]
    pub fn cashier(mut self, vault_access: bool) -> Self {
        self.role = RoleTag::Cashier;
        self.vault_access = Some(vault_access);
        self
    }

    /// Sets the role to waiter.
    #[must_use]
    pub fn waiter(mut self, tables: u32) -> Self {
        self.role = RoleTag::Waiter;
        self.tables = Some(tables);
        self
    }

    /// Sets the role to chef.
    #[must_use]
    pub fn chef(mut self) -> Self {
        self.role = RoleTag::Chef;
        self
    }

    /// Sets the role to head chef.
    #[must_use]
    pub fn head_chef(mut self, signature_dish: impl Into<String>) -> Self {
        self.role = RoleTag::HeadChef;
        self.signature_dish = Some(signature_dish.into());
        self
    }

    /// Sets a full-time contract.
    #[must_use]
    pub fn full_time(mut self, shift: ShiftPattern, salary: Money) -> Self {
        self.contract = ContractTag::FullTime;
        self.shift = Some(shift);
        self.salary = Some(salary);
        self
    }

    /// Sets a part-time contract.
    #[must_use]
    pub fn part_time(mut self, hours: u32, hourly_rate: Money) -> Self {
        self.contract = ContractTag::PartTime;
        self.hours = Some(hours);
        self.hourly_rate = Some(hourly_rate);
        self
    }

    /// Sets contact details.
    #[must_use]
    pub fn contact(mut self, phone: Option<String>, email: Option<String>) -> Self {
        self.phone = phone;
        self.email = email;
        self
    }

    /// Validates the draft and builds the staff record.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an attribute outside the role's or
    /// contract's legal set is populated, a mandatory one is missing, or a
    /// scalar is out of range.
    pub fn build(self) -> Result<Staff> {
        ROLE_RULES.validate(&self)?;
        CONTRACT_RULES.validate(&self)?;

        let role = match self.role {
            RoleTag::Manager => Role::Manager {
                level: present(self.level, "level")?,
            },
            RoleTag::Cashier => Role::Cashier {
                vault_access: present(self.vault_access, "vault_access")?,
            },
            RoleTag::Waiter => Role::Waiter {
                tables: present(self.tables, "tables")?,
            },
            RoleTag::Chef => Role::Chef,
            RoleTag::HeadChef => Role::HeadChef {
                signature_dish: check::non_blank(
                    "signature_dish",
                    present(self.signature_dish, "signature_dish")?,
                )?,
            },
        };

        let contract = match self.contract {
            ContractTag::FullTime => Contract::FullTime {
                shift: present(self.shift, "shift")?,
                salary: check::non_negative("salary", present(self.salary, "salary")?)?,
            },
            ContractTag::PartTime => {
                let hours = check::positive("hours", present(self.hours, "hours")?)?;
                let hourly_rate = present(self.hourly_rate, "hourly_rate")?;
                if hourly_rate.cents() <= 0 {
                    return Err(Error::validation("hourly_rate", "must be greater than 0"));
                }
                Contract::PartTime { hours, hourly_rate }
            }
        };

        Ok(Staff {
            id: check::identity(self.id)?,
            first_name: check::non_blank("first_name", self.first_name)?,
            last_name: check::non_blank("last_name", self.last_name)?,
            department: check::non_blank("department", self.department)?,
            phone: check::optional_non_blank("phone", self.phone)?,
            email: check::optional_non_blank("email", self.email)?,
            role,
            contract,
        })
    }
}

/// A staff member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Identity.
    pub id: EntityId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Department.
    pub department: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// What the staff member does.
    pub role: Role,
    /// Employment terms.
    pub contract: Contract,
}

impl_record!(Staff, "staff");

impl Staff {
    /// Returns the pay under the current contract.
    #[must_use]
    pub fn salary(&self) -> Money {
        self.contract.salary()
    }

    /// Returns "first last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if this staff member may manage `other`.
    ///
    /// Only managers manage. A manager may manage anyone who is not a
    /// manager, and a manager strictly junior to them.
    #[must_use]
    pub fn can_manage(&self, other: &Staff) -> bool {
        match (self.role.level(), other.role.level()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(mine), Some(theirs)) => mine > theirs,
        }
    }

    /// Flattens this record back into its draft form.
    #[must_use]
    pub fn draft(&self) -> StaffDraft {
        let mut draft = StaffDraft::new(
            self.id,
            self.first_name.clone(),
            self.last_name.clone(),
            self.department.clone(),
        )
        .contact(self.phone.clone(), self.email.clone());

        draft = match &self.role {
            Role::Manager { level } => draft.manager(*level),
            Role::Cashier { vault_access } => draft.cashier(*vault_access),
            Role::Waiter { tables } => draft.waiter(*tables),
            Role::Chef => draft.chef(),
            Role::HeadChef { signature_dish } => draft.head_chef(signature_dish.clone()),
        };

        match &self.contract {
            Contract::FullTime { shift, salary } => draft.full_time(*shift, *salary),
            Contract::PartTime { hours, hourly_rate } => draft.part_time(*hours, *hourly_rate),
        }
    }

    /// Fails with an association error naming both sides unless this staff
    /// member may manage `other`.
    pub(crate) fn ensure_manages(&self, other: &Staff) -> Result<()> {
        if self.can_manage(other) {
            Ok(())
        } else {
            Err(Error::association(format!(
                "{} cannot manage {}",
                self.describe(),
                other.describe()
            )))
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self.role.level() {
            Some(level) => format!("{} ({level:?} manager)", self.full_name()),
            None => format!("{} ({})", self.full_name(), self.role.tag()),
        }
    }
}
