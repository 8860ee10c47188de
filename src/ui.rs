use crate::models::TrackerView;

pub fn render_index(view: &TrackerView) -> String {
    let state = serde_json::to_string(view)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c");
    let title = view.current_habit.as_deref().unwrap_or("Select a habit");
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{TOTAL}}", &view.stats.total_days.to_string())
        .replace("{{STREAK}}", &view.stats.current_streak.to_string())
        .replace("{{YEAR}}", &view.year.to_string())
        .replace("{{STATE}}", &state)
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Grid</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      --cell: #ece6dc;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .add-row {
      display: flex;
      gap: 10px;
    }

    .add-row input {
      flex: 1;
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 12px 18px;
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    .habit-list {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .habit-item {
      display: inline-flex;
      align-items: center;
      gap: 8px;
      background: white;
      border: 1px solid rgba(47, 72, 88, 0.1);
      border-radius: 999px;
      padding: 6px 8px 6px 16px;
    }

    .habit-item.active {
      border-color: var(--accent);
      box-shadow: 0 6px 14px rgba(255, 107, 74, 0.2);
    }

    .habit-name {
      cursor: pointer;
    }

    .delete-habit {
      padding: 2px 10px;
      background: transparent;
      color: #8b857d;
    }

    .confirm {
      display: none;
      align-items: center;
      gap: 12px;
      background: #fff4ef;
      border-radius: 18px;
      padding: 12px 16px;
    }

    .confirm.open {
      display: flex;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .grid-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      overflow-x: auto;
    }

    .habit-grid {
      display: grid;
      grid-template-rows: repeat(7, 12px);
      grid-auto-flow: column;
      grid-auto-columns: 12px;
      gap: 3px;
    }

    .habit-cell {
      border-radius: 3px;
    }

    .habit-cell[data-date] {
      background: var(--cell);
      cursor: pointer;
    }

    .habit-cell.active {
      background: var(--accent);
    }

    .habit-cell.today {
      outline: 2px solid var(--accent-2);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1 id="currentHabit">{{TITLE}}</h1>
    </header>

    <div class="add-row">
      <input id="newHabitInput" type="text" placeholder="New habit" autocomplete="off" />
      <button id="addHabit" type="button">Add</button>
    </div>

    <div id="habitList" class="habit-list"></div>

    <div id="confirmDelete" class="confirm">
      <span id="confirmText"></span>
      <button id="confirmYes" type="button">Delete</button>
      <button id="confirmNo" class="secondary" type="button">Cancel</button>
    </div>

    <section class="stats">
      <div class="stat">
        <span class="label">Total days</span>
        <span id="totalDays" class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Current streak</span>
        <span id="currentStreak" class="value">{{STREAK}}</span>
      </div>
      <div class="stat">
        <span class="label">Year</span>
        <span class="value">{{YEAR}}</span>
      </div>
    </section>

    <div>
      <button id="toggleToday" class="secondary" type="button">Toggle today</button>
    </div>

    <div class="grid-card">
      <div id="habitGrid" class="habit-grid"></div>
    </div>
  </main>

  <script>
    const initialState = {{STATE}};

    const titleEl = document.getElementById('currentHabit');
    const input = document.getElementById('newHabitInput');
    const listEl = document.getElementById('habitList');
    const gridEl = document.getElementById('habitGrid');
    const totalEl = document.getElementById('totalDays');
    const streakEl = document.getElementById('currentStreak');
    const confirmEl = document.getElementById('confirmDelete');
    const confirmText = document.getElementById('confirmText');

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const renderStats = (stats) => {
      totalEl.textContent = stats.total_days;
      streakEl.textContent = stats.current_streak;
    };

    const renderList = (view) => {
      listEl.innerHTML = '';
      view.habits.forEach((habit) => {
        const item = document.createElement('div');
        item.className = 'habit-item';
        if (habit.selected) {
          item.classList.add('active');
        }

        const name = document.createElement('span');
        name.className = 'habit-name';
        name.textContent = habit.name;
        name.addEventListener('click', () => {
          post('/api/habits/select', { name: habit.name }).then(render).catch(report);
        });

        const remove = document.createElement('button');
        remove.className = 'delete-habit';
        remove.type = 'button';
        remove.textContent = '×';
        remove.title = 'Delete habit';
        remove.addEventListener('click', (event) => {
          event.stopPropagation();
          post('/api/habits/delete', { name: habit.name }).then(render).catch(report);
        });

        item.appendChild(name);
        item.appendChild(remove);
        listEl.appendChild(item);
      });
    };

    const renderConfirm = (view) => {
      if (view.pending_delete) {
        confirmText.textContent = `Are you sure you want to delete "${view.pending_delete}"?`;
        confirmEl.classList.add('open');
      } else {
        confirmEl.classList.remove('open');
      }
    };

    const renderGrid = (view) => {
      gridEl.innerHTML = '';
      view.grid.forEach((cell) => {
        const el = document.createElement('div');
        el.className = 'habit-cell';
        if (cell.date) {
          el.dataset.date = cell.date;
          el.title = cell.date;
          if (cell.active) {
            el.classList.add('active');
          }
          if (cell.date === view.today) {
            el.classList.add('today');
          }
        }
        gridEl.appendChild(el);
      });
    };

    const render = (view) => {
      titleEl.textContent = view.current_habit || 'Select a habit';
      renderList(view);
      renderConfirm(view);
      renderGrid(view);
      renderStats(view.stats);
    };

    const report = (err) => console.error(err);

    const applyToggle = (result) => {
      if (result.active === null) {
        return;
      }
      const cell = gridEl.querySelector(`[data-date="${result.date}"]`);
      if (cell) {
        cell.classList.toggle('active', result.active);
      }
      renderStats(result.stats);
    };

    const addHabit = () => {
      const name = input.value.trim();
      if (!name) {
        return;
      }
      input.value = '';
      post('/api/habits', { name }).then(render).catch(report);
    };

    document.getElementById('addHabit').addEventListener('click', addHabit);
    input.addEventListener('keypress', (event) => {
      if (event.key === 'Enter') {
        addHabit();
      }
    });

    gridEl.addEventListener('click', (event) => {
      const date = event.target.dataset && event.target.dataset.date;
      if (date) {
        post('/api/toggle', { date }).then(applyToggle).catch(report);
      }
    });

    document.getElementById('toggleToday').addEventListener('click', () => {
      post('/api/toggle/today').then(applyToggle).catch(report);
    });

    document.getElementById('confirmYes').addEventListener('click', () => {
      post('/api/habits/delete/confirm').then(render).catch(report);
    });

    document.getElementById('confirmNo').addEventListener('click', () => {
      post('/api/habits/delete/cancel').then(render).catch(report);
    });

    if (initialState) {
      render(initialState);
    }
  </script>
</body>
</html>
"#;
