use shared::Category;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
    // Form state
    pub amount: String,
    pub description: String,
    pub category: String,
    pub creating: bool,
    pub form_error: Option<String>,

    // Event handlers
    pub on_amount_change: Callback<Event>,
    pub on_description_change: Callback<Event>,
    pub on_category_change: Callback<Event>,
    pub on_submit: Callback<()>,
}

#[function_component(ExpenseForm)]
pub fn expense_form(props: &ExpenseFormProps) -> Html {
    html! {
        <section class="card form-card">
            <h2>{"Add New Expense"}</h2>

            {if let Some(error) = props.form_error.as_ref() {
                html! {
                    <div class="error-message">
                        {error}
                    </div>
                }
            } else { html! {} }}

            <form onsubmit={
                let on_submit = props.on_submit.clone();
                Callback::from(move |e: SubmitEvent| {
                    e.prevent_default();
                    on_submit.emit(());
                })
            }>
                <div class="form-group">
                    <label for="amount">{"Amount"}</label>
                    <input
                        type="number"
                        id="amount"
                        placeholder="0.00"
                        step="0.01"
                        value={props.amount.clone()}
                        onchange={props.on_amount_change.clone()}
                        disabled={props.creating}
                    />
                </div>

                <div class="form-group">
                    <label for="description">{"Description"}</label>
                    <input
                        type="text"
                        id="description"
                        placeholder="What was it for?"
                        value={props.description.clone()}
                        onchange={props.on_description_change.clone()}
                        disabled={props.creating}
                    />
                </div>

                <div class="form-group">
                    <label for="category">{"Category"}</label>
                    <select
                        id="category"
                        value={props.category.clone()}
                        onchange={props.on_category_change.clone()}
                        disabled={props.creating}
                    >
                        {for Category::ALL.iter().map(|category| {
                            html! {
                                <option
                                    value={category.as_str()}
                                    selected={props.category == category.as_str()}
                                >
                                    {category.as_str()}
                                </option>
                            }
                        })}
                    </select>
                </div>

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled={props.creating}
                >
                    {if props.creating { "Adding..." } else { "Add Expense" }}
                </button>
            </form>
        </section>
    }
}
