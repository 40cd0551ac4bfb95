use crate::domain::entities::Meal;
use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;
use crate::use_cases::lookup_guest::find_guest;

#[derive(Debug)]
pub struct MealSaved {
    pub guest_id: i64,
    pub meal: Meal,
}

// Stores the guest's meal choice.
pub struct ChooseMealUseCase<S> {
    pub store: S,
}

impl<S> ChooseMealUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self, token: &str, meal: &str) -> Result<MealSaved, RsvpError> {
        let guest = find_guest(&self.store, token).await?;
        let meal = Meal::parse(meal).ok_or(RsvpError::InvalidMeal)?;

        self.store
            .set_meal(guest.id, meal)
            .await
            .map_err(|_| RsvpError::StorageFailure)?;

        Ok(MealSaved {
            guest_id: guest.id,
            meal,
        })
    }
}
